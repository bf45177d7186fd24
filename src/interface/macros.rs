/// Restores the defaults of a mocked function: disabled, default scope,
/// default adapters.
///
/// `reset!(path::to::function)` is shorthand for
/// `path::to::function::reset()`.
#[macro_export]
macro_rules! reset {
    ($($f:ident)::+) => {
        $($f)::+::reset()
    };
}

/// Enables a mocked function.
#[macro_export]
macro_rules! enable {
    ($($f:ident)::+) => {
        $($f)::+::enable()
    };
}

/// Disables a mocked function, keeping its configuration.
#[macro_export]
macro_rules! disable {
    ($($f:ident)::+) => {
        $($f)::+::disable()
    };
}

/// Selects the collaborator scope calls are reported to.
///
/// Evaluates to `Result<(), MoxieError>`; the mock must be enabled.
#[macro_export]
macro_rules! set_scope {
    ($($f:ident)::+, $scope:expr) => {
        $($f)::+::set_scope($scope)
    };
}

/// Replaces the call adapter of a mocked function.
///
/// Pass `None` to remove it. Evaluates to `Result<(), MoxieError>`; the mock
/// must be enabled.
///
/// # Example
///
/// ```rust
/// use moxie::{enable, mock, reset, set_call_adapter};
///
/// #[mock]
/// pub fn scale(x: i32) -> i32 {
///     x * 10
/// }
///
/// fn main() {
///     enable!(scale);
///     set_call_adapter!(scale, |_support, _call, x: &mut i32| *x += 1).unwrap();
///
///     assert_eq!(scale(1), 20);
///
///     reset!(scale);
///     assert_eq!(scale(1), 10);
/// }
/// ```
#[macro_export]
macro_rules! set_call_adapter {
    ($($f:ident)::+, None) => {
        $($f)::+::clear_call_adapter()
    };
    ($($f:ident)::+, $adapter:expr) => {
        $($f)::+::set_call_adapter($adapter)
    };
}

/// Replaces the return adapter of a mocked function.
///
/// Pass `None` to remove it, so the real function produces the
/// result. Evaluates to `Result<(), MoxieError>`; the mock must be enabled.
#[macro_export]
macro_rules! set_return_adapter {
    ($($f:ident)::+, None) => {
        $($f)::+::clear_return_adapter()
    };
    ($($f:ident)::+, $adapter:expr) => {
        $($f)::+::set_return_adapter($adapter)
    };
}

/// Calls the real body of a mocked function, bypassing the
/// mock.
#[macro_export]
macro_rules! real {
    ($($f:ident)::+ ($($arg:expr),* $(,)?)) => {
        $($f)::+::real($($arg),*)
    };
}

/// Calls a mocked function through its dispatcher.
#[macro_export]
macro_rules! wrapped {
    ($($f:ident)::+ ($($arg:expr),* $(,)?)) => {
        $($f)::+::wrapped($($arg),*)
    };
}
