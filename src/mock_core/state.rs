use std::fmt;
use std::rc::Rc;

use crate::error::MoxieError;
use crate::support;

use super::route::Route;

/// Shared handle to an adapter, compared by identity.
pub trait AdapterRef: Clone {
    fn same_adapter(&self, other: &Self) -> bool;
}

impl<T: ?Sized> AdapterRef for Rc<T> {
    fn same_adapter(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Configuration of one mocked function on one thread.
///
/// A freshly built or reset state is disabled, uses the default scope and
/// has the default adapters installed. Enabling and disabling keep the rest
/// of the configuration; only [`reset`](Self::reset) restores it.
///
/// Scope and adapters can only be changed while the state is enabled.
/// Otherwise the setters return [`MoxieError::NotEnabled`] and leave the
/// state untouched.
#[derive(Clone)]
pub struct MockState<C, S> {
    function: &'static str,
    enabled: bool,
    scope: String,
    call_adapter: Option<C>,
    return_adapter: Option<S>,
    default_call_adapter: C,
    default_return_adapter: S,
}

impl<C: AdapterRef, S: AdapterRef> MockState<C, S> {
    pub fn new(function: &'static str, default_call_adapter: C, default_return_adapter: S) -> Self {
        Self {
            function,
            enabled: false,
            scope: String::new(),
            call_adapter: Some(default_call_adapter.clone()),
            return_adapter: Some(default_return_adapter.clone()),
            default_call_adapter,
            default_return_adapter,
        }
    }

    /// Name calls are recorded under.
    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn reset(&mut self) {
        self.enabled = false;
        self.scope.clear();
        self.call_adapter = Some(self.default_call_adapter.clone());
        self.return_adapter = Some(self.default_return_adapter.clone());
        log::debug!("mock `{}` reset", self.function);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        log::debug!("mock `{}` enabled", self.function);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        log::debug!("mock `{}` disabled", self.function);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Collaborator scope calls are reported to; empty for the default one.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn call_adapter(&self) -> Option<&C> {
        self.call_adapter.as_ref()
    }

    pub fn return_adapter(&self) -> Option<&S> {
        self.return_adapter.as_ref()
    }

    pub fn set_scope(&mut self, scope: impl Into<String>) -> Result<(), MoxieError> {
        self.ensure_enabled("scope")?;
        self.scope = scope.into();
        log::debug!("mock `{}` reports to scope `{}`", self.function, self.scope);
        Ok(())
    }

    /// Installs `adapter`, or removes the call adapter with `None`.
    pub fn set_call_adapter(&mut self, adapter: Option<C>) -> Result<(), MoxieError> {
        self.ensure_enabled("call adapter")?;
        self.call_adapter = adapter;
        log::debug!("mock `{}` call adapter replaced", self.function);
        Ok(())
    }

    /// Installs `adapter`, or removes the return adapter with `None` so the
    /// real function produces the result.
    pub fn set_return_adapter(&mut self, adapter: Option<S>) -> Result<(), MoxieError> {
        self.ensure_enabled("return adapter")?;
        self.return_adapter = adapter;
        log::debug!("mock `{}` return adapter replaced", self.function);
        Ok(())
    }

    /// Whether the state equals a freshly reset one.
    pub fn is_default(&self) -> bool {
        !self.enabled
            && self.scope.is_empty()
            && self
                .call_adapter
                .as_ref()
                .is_some_and(|a| a.same_adapter(&self.default_call_adapter))
            && self
                .return_adapter
                .as_ref()
                .is_some_and(|a| a.same_adapter(&self.default_return_adapter))
    }

    /// Decides where the current invocation goes. When enabled, the call is
    /// started in the configured scope before the adapters see it.
    pub fn route(&self) -> Route<C, S> {
        if !self.enabled {
            return Route::Real;
        }
        let support = if self.scope.is_empty() {
            support::mock()
        } else {
            support::mock_scope(&self.scope)
        };
        let call = support.actual_call(self.function);
        Route::Mock {
            support,
            call,
            call_adapter: self.call_adapter.clone(),
            return_adapter: self.return_adapter.clone(),
        }
    }

    fn ensure_enabled(&self, setting: &str) -> Result<(), MoxieError> {
        if self.enabled {
            return Ok(());
        }
        log::warn!(
            "ignoring {} change for mock `{}`: it is not enabled",
            setting,
            self.function
        );
        Err(MoxieError::NotEnabled {
            function: self.function,
        })
    }
}

impl<C, S> fmt::Debug for MockState<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockState")
            .field("function", &self.function)
            .field("enabled", &self.enabled)
            .field("scope", &self.scope)
            .field("call_adapter", &self.call_adapter.is_some())
            .field("return_adapter", &self.return_adapter.is_some())
            .finish()
    }
}
