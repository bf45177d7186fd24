//! # Moxie
//!
//! **Moxie** makes free functions mockable without traits or dependency injection in the production code. Annotate a function with [`#[mock]`](macro@mock) and every call goes through a small dispatcher. While the mock is disabled, the dispatcher simply runs the original body. Once it is enabled, the call is reported to an expectation-tracking collaborator ([`support`]) and adapters decide what the caller sees.
//!
//! ## Why Moxie
//!
//! Code that talks to the outside world through free functions (a C library wrapper, a clock, a sensor driver) is hard to unit test. Wrapping each of those functions in a trait only for testing adds indirection that production never needs. With Moxie the function keeps its name and signature, and tests switch it between the real implementation and a mock per thread.
//!
//! ### Example Scenario
//!
//! ```rust
//! use moxie::mock;
//!
//! #[mock]
//! pub fn read_register(address: u32) -> u32 {
//!     // Talks to hardware in production.
//!     address & 0xff
//! }
//!
//! fn is_ready() -> bool {
//!     read_register(0x40) & 1 == 1
//! }
//!
//! fn main() {
//!     read_register::enable();
//!     moxie::support::mock()
//!         .expect_call("read_register")
//!         .and_return_value(1u32);
//!
//!     assert!(is_ready());
//!
//!     let call = moxie::support::mock().last_call("read_register").unwrap();
//!     assert_eq!(call.parameter("address"), Some(&moxie::Value::UInt(0x40)));
//!
//!     read_register::reset();
//!     assert!(!is_ready());
//! }
//! ```
//!
//! `is_ready()` is unchanged; the test decides what `read_register` returns and checks how it was called.
//!
//! ## Usage
//!
//! Add Moxie to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! moxie = "0.1"
//! ```
//!
//! Import the attribute:
//!
//! ```rust
//! use moxie::mock;
//! ```
//!
//! ## Features and Examples
//!
//! ### Parameter Tracking
//!
//! Each argument is reported under its own name. The kind is inferred from the type or chosen with `#[param(kind)]`:
//!
//! ```rust
//! use moxie::mock;
//!
//! #[mock]
//! pub fn send(#[param(ignore)] socket: i32, payload: &str, #[param(uint)] len: usize) -> bool {
//!     let _ = (socket, payload, len);
//!     true
//! }
//!
//! fn main() {
//!     send::enable();
//!     send(3, "ping", 4);
//!
//!     let call = moxie::support::mock().last_call("send").unwrap();
//!     assert_eq!(call.parameter("socket"), None);
//!     assert_eq!(call.parameter("payload"), Some(&moxie::Value::String("ping".into())));
//!     assert_eq!(call.parameter("len"), Some(&moxie::Value::UInt(4)));
//! }
//! ```
//!
//! ### Output Parameters
//!
//! `&mut T` and `&mut [T]` arguments are output parameters. A configured value is written back before the result is produced; a slice receives the leading elements of a configured `Vec`:
//!
//! ```rust
//! use moxie::mock;
//!
//! #[mock]
//! pub fn measure(target: &mut f64) -> bool {
//!     *target = 0.0;
//!     false
//! }
//!
//! fn main() {
//!     measure::enable();
//!     moxie::support::mock()
//!         .expect_call("measure")
//!         .with_output_parameter_returning("target", 12.5f64)
//!         .and_return_value(true);
//!
//!     let mut value = 0.0;
//!     assert!(measure(&mut value));
//!     assert_eq!(value, 12.5);
//! }
//! ```
//!
//! ### Custom Adapters
//!
//! The call adapter sees the arguments mutably before the result is produced, and the return adapter produces the result itself. Both are plain closures:
//!
//! ```rust
//! use moxie::mock;
//!
//! #[mock]
//! pub fn divide(a: i32, b: i32) -> i32 {
//!     a / b
//! }
//!
//! fn main() {
//!     divide::enable();
//!     divide::set_return_adapter(|_support, _call, a, b| if b == 0 { 0 } else { a / b }).unwrap();
//!
//!     assert_eq!(divide(4, 0), 0);
//!
//!     divide::reset();
//!     assert_eq!(divide(4, 2), 2);
//! }
//! ```
//!
//! ### Scoped Mocking
//!
//! [`MockSession`] resets every mock it enabled when it goes out of scope:
//!
//! ```rust
//! use moxie::{mock, MockSession};
//!
//! #[mock]
//! pub fn is_online() -> bool {
//!     false
//! }
//!
//! fn main() {
//!     {
//!         let mut session = MockSession::new();
//!         session.enable_in_scope(is_online::handle(), "network").unwrap();
//!         moxie::support::mock_scope("network")
//!             .expect_call("is_online")
//!             .and_return_value(true);
//!
//!         assert!(is_online());
//!     }
//!
//!     // Outside the scope, original behavior is restored
//!     assert!(!is_online());
//! }
//! ```
//!
//! ## Threads
//!
//! Mock state and collaborator scopes are per thread. A mock enabled in one test never affects another test running in parallel, and a function called from a spawned thread runs its real implementation unless that thread enables the mock itself.

mod error;
pub mod interface;
mod mock_core;
pub mod support;

pub use moxie_macros::mock;

pub use crate::error::MoxieError;
pub use crate::interface::session::{MockHandle, MockSession};
pub use crate::mock_core::route::Route;
pub use crate::mock_core::state::{AdapterRef, MockState};
pub use crate::support::{ActualCall, MockSupport, Value};
