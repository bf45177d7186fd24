//! The expectation-tracking collaborator.
//!
//! Calls intercepted by an enabled mock are reported to a [`MockSupport`]
//! scope: the default scope from [`mock`] or a named one from
//! [`mock_scope`]. Scopes live in a per-thread registry, so tests running in
//! parallel never observe each other's calls.
//!
//! A scope keeps every actual call in order together with a FIFO queue of
//! expected calls. An actual call consumes the first pending expectation for
//! the same function name and takes its return value and output parameter
//! values from it.

mod call;
mod expectation;
mod params;
mod value;

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

pub use self::call::ActualCall;
pub use self::expectation::ExpectedCall;
pub use self::params::{Address, OutputTarget, StringParam};
pub use self::value::{CallRecord, FromValue, Parameter, Value};

use self::expectation::Expectation;

thread_local! {
    static REGISTRY: RefCell<HashMap<String, Rc<RefCell<ScopeRecord>>>> =
        RefCell::new(HashMap::new());
}

#[derive(Debug, Default)]
pub(crate) struct ScopeRecord {
    pub(crate) calls: Vec<CallRecord>,
    pub(crate) expectations: VecDeque<Expectation>,
    /// Bumped on every clear so in-flight calls stop reporting.
    pub(crate) generation: u64,
    next_id: u64,
}

impl ScopeRecord {
    fn take_expectation(&mut self, function: &str) -> Option<Expectation> {
        let index = self.expectations.iter().position(|e| e.function == function)?;
        self.expectations.remove(index)
    }
}

/// The default scope of the current thread.
pub fn mock() -> MockSupport {
    mock_scope("")
}

/// The scope called `name` on the current thread, created on first use.
pub fn mock_scope(name: &str) -> MockSupport {
    let record = REGISTRY.with(|registry| {
        registry
            .borrow_mut()
            .entry(name.to_owned())
            .or_default()
            .clone()
    });
    MockSupport {
        scope: name.to_owned(),
        record,
    }
}

/// Forgets every scope of the current thread.
pub fn clear_all() {
    REGISTRY.with(|registry| registry.borrow_mut().clear());
    log::debug!("cleared all mock support scopes");
}

/// Handle to one scope of the collaborator.
///
/// Handles are cheap to clone and all handles for the same scope on the
/// same thread share the recorded calls and pending expectations.
#[derive(Clone)]
pub struct MockSupport {
    scope: String,
    record: Rc<RefCell<ScopeRecord>>,
}

impl MockSupport {
    /// Name of the scope; empty for the default scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Starts recording a call to `function`.
    pub fn actual_call(&self, function: &str) -> ActualCall {
        let (slot, expectation) = {
            let mut record = self.record.borrow_mut();
            record.calls.push(CallRecord::new(function));
            let slot = (record.generation, record.calls.len() - 1);
            (slot, record.take_expectation(function))
        };
        log::trace!(
            "call to `{}` in scope `{}` (expected: {})",
            function,
            self.scope,
            expectation.is_some()
        );
        ActualCall::new(function, Rc::clone(&self.record), slot, expectation)
    }

    /// Queues an expected call to `function`.
    pub fn expect_call(&self, function: &str) -> ExpectedCall {
        let id = {
            let mut record = self.record.borrow_mut();
            let id = record.next_id;
            record.next_id += 1;
            record.expectations.push_back(Expectation::new(id, function));
            id
        };
        ExpectedCall::new(Rc::clone(&self.record), id)
    }

    /// Every call recorded in this scope, oldest first.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.record.borrow().calls.clone()
    }

    pub fn call_count(&self, function: &str) -> usize {
        self.record
            .borrow()
            .calls
            .iter()
            .filter(|c| c.function == function)
            .count()
    }

    pub fn last_call(&self, function: &str) -> Option<CallRecord> {
        self.record
            .borrow()
            .calls
            .iter()
            .rev()
            .find(|c| c.function == function)
            .cloned()
    }

    /// Number of expectations not yet consumed by an actual call.
    pub fn pending_expectations(&self) -> usize {
        self.record.borrow().expectations.len()
    }

    /// Drops recorded calls and pending expectations. Calls still in
    /// flight keep running but no longer record their parameters.
    pub fn clear(&self) {
        let mut record = self.record.borrow_mut();
        record.calls.clear();
        record.expectations.clear();
        record.generation += 1;
    }
}

impl fmt::Debug for MockSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record.borrow();
        f.debug_struct("MockSupport")
            .field("scope", &self.scope)
            .field("calls", &record.calls.len())
            .field("pending_expectations", &record.expectations.len())
            .finish()
    }
}
