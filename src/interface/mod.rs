mod macros;
pub mod session;
