use std::fmt;

use crate::error::MoxieError;

/// Type-erased controls of one mocked function.
///
/// Every `#[mock]` function exposes one through `<function>::handle()`. The
/// controls act on the mock state of the calling thread.
#[derive(Clone, Copy)]
pub struct MockHandle {
    name: &'static str,
    reset: fn(),
    enable: fn(),
    disable: fn(),
    is_enabled: fn() -> bool,
    set_scope: fn(&str) -> Result<(), MoxieError>,
}

impl MockHandle {
    pub fn new(
        name: &'static str,
        reset: fn(),
        enable: fn(),
        disable: fn(),
        is_enabled: fn() -> bool,
        set_scope: fn(&str) -> Result<(), MoxieError>,
    ) -> Self {
        Self {
            name,
            reset,
            enable,
            disable,
            is_enabled,
            set_scope,
        }
    }

    /// Name calls to the function are recorded under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn reset(&self) {
        (self.reset)()
    }

    pub fn enable(&self) {
        (self.enable)()
    }

    pub fn disable(&self) {
        (self.disable)()
    }

    pub fn is_enabled(&self) -> bool {
        (self.is_enabled)()
    }

    pub fn set_scope(&self, scope: &str) -> Result<(), MoxieError> {
        (self.set_scope)(scope)
    }
}

impl fmt::Debug for MockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHandle").field("name", &self.name).finish()
    }
}

/// Enables mocks for the lifetime of a test and resets them when dropped.
///
/// Resetting also happens when the test panics, so a failing test never
/// leaves an enabled mock behind for the next test on the same thread.
///
/// # Example
///
/// ```rust
/// use moxie::{mock, MockSession};
///
/// #[mock]
/// pub fn temperature() -> f64 {
///     20.0
/// }
///
/// fn main() {
///     {
///         let mut session = MockSession::new();
///         session.enable(temperature::handle());
///         moxie::support::mock()
///             .expect_call("temperature")
///             .and_return_value(-3.5);
///
///         assert_eq!(temperature(), -3.5);
///     }
///
///     assert!(!temperature::is_enabled());
///     assert_eq!(temperature(), 20.0);
/// }
/// ```
pub struct MockSession {
    handles: Vec<MockHandle>,
}

impl MockSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Enables the mock behind `handle` until the session is dropped.
    pub fn enable(&mut self, handle: MockHandle) -> MockHandle {
        handle.enable();
        self.handles.push(handle);
        handle
    }

    /// Enables the mock behind `handle` and reports its calls to `scope`.
    ///
    /// The mock stays registered with the session even if selecting the
    /// scope fails.
    pub fn enable_in_scope(&mut self, handle: MockHandle, scope: &str) -> Result<MockHandle, MoxieError> {
        self.enable(handle);
        handle.set_scope(scope)?;
        Ok(handle)
    }

    /// Number of mocks enabled through this session.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        for handle in self.handles.drain(..).rev() {
            handle.reset();
            log::debug!("session reset mock `{}`", handle.name());
        }
    }
}
