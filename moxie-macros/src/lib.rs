//! Procedural macros for [`moxie`].
//!
//! [`moxie`]: https://docs.rs/moxie/

extern crate proc_macro;

mod args;
mod assemble;
mod descriptor;
mod projection;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

use crate::args::MockArgs;

/// Makes a free function mockable.
///
/// The function keeps its name and signature; every call goes through a
/// dispatcher that either runs the original body or, once the mock is
/// enabled, reports the call to `moxie::support` and lets adapters decide
/// the result. A module with the same name as the function holds the
/// controls (`enable`, `reset`, `set_scope`, `set_call_adapter`,
/// `set_return_adapter`, `real`, ...).
///
/// # Options
///
/// - `returns = kind`: how a configured return value becomes the result.
///   One of `bool`, `int`, `uint`, `long`, `ulong`, `double`, `string`,
///   `ptr`, `void` or `custom(<expr>)`. Inferred from the return type when
///   omitted.
/// - `name = "..."`: the name calls are recorded under. Defaults to the
///   function name.
///
/// # Parameter attributes
///
/// `#[param(kind)]` on an argument selects how it is reported: `bool`,
/// `int`, `uint`, `long`, `ulong`, `double`, `string`, `in_ptr`, `out_ptr`,
/// `in_type_ptr`, `out_type_ptr`, `ignore` or `custom(<statements>)`.
/// Inferred from the argument type when omitted. Custom code sees the
/// argument as `&mut T` next to `support` and `call`.
///
/// # Example
///
/// ```ignore
/// #[moxie::mock]
/// pub fn pow(x: f64, y: f64) -> f64 {
///     x.powf(y)
/// }
/// ```
#[proc_macro_attribute]
pub fn mock(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as MockArgs);
    let item = parse_macro_input!(item as ItemFn);

    assemble::expand(args, item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
