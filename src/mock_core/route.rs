use std::fmt;

use crate::support::{ActualCall, MockSupport};

/// Where an invocation of a mocked function goes.
///
/// Produced by [`MockState::route`](crate::MockState::route) and matched by
/// the generated dispatcher. The adapters are cloned out of the state so no
/// borrow of it is held while they run; an adapter may therefore reconfigure
/// its own mock.
pub enum Route<C, S> {
    /// The mock is disabled: run the real function without
    /// reporting anything.
    Real,
    /// The mock is enabled: `call` was already started in `support`.
    Mock {
        support: MockSupport,
        call: ActualCall,
        call_adapter: Option<C>,
        return_adapter: Option<S>,
    },
}

impl<C, S> Route<C, S> {
    pub fn is_real(&self) -> bool {
        matches!(self, Route::Real)
    }
}

impl<C, S> fmt::Debug for Route<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Real => f.write_str("Real"),
            Route::Mock {
                support,
                call,
                call_adapter,
                return_adapter,
            } => f
                .debug_struct("Mock")
                .field("support", support)
                .field("call", call)
                .field("call_adapter", &call_adapter.is_some())
                .field("return_adapter", &return_adapter.is_some())
                .finish(),
        }
    }
}
