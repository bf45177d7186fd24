pub mod route;
pub mod state;
