use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::value::Value;
use super::ScopeRecord;

/// Value written back through an output parameter.
#[derive(Clone)]
pub(crate) struct OutputValue {
    pub(crate) type_name: Option<String>,
    pub(crate) value: Rc<dyn Any>,
}

/// One expected call, consumed by the first matching actual call.
#[derive(Clone)]
pub(crate) struct Expectation {
    pub(crate) id: u64,
    pub(crate) function: String,
    pub(crate) return_value: Option<Value>,
    pub(crate) outputs: HashMap<String, OutputValue>,
}

impl Expectation {
    pub(crate) fn new(id: u64, function: &str) -> Self {
        Self {
            id,
            function: function.to_owned(),
            return_value: None,
            outputs: HashMap::new(),
        }
    }

    pub(crate) fn output(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("function", &self.function)
            .field("return_value", &self.return_value)
            .field("outputs", &self.outputs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder returned by [`MockSupport::expect_call`](super::MockSupport::expect_call).
///
/// Each method configures the pending expectation in place; the builder can
/// be dropped at any time.
///
/// # Example
///
/// ```rust
/// let support = moxie::support::mock_scope("doc-expect");
/// support
///     .expect_call("read_sensor")
///     .with_output_parameter_returning("reading", 21.5f64)
///     .and_return_value(0);
///
/// let mut call = support.actual_call("read_sensor");
/// let mut reading = 0.0f64;
/// call.with_output_parameter("reading", &mut reading);
///
/// assert_eq!(reading, 21.5);
/// assert_eq!(call.int_return_value(), 0);
/// ```
pub struct ExpectedCall {
    record: Rc<RefCell<ScopeRecord>>,
    id: u64,
}

impl ExpectedCall {
    pub(crate) fn new(record: Rc<RefCell<ScopeRecord>>, id: u64) -> Self {
        Self { record, id }
    }

    /// Sets the value the matching call returns.
    pub fn and_return_value(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|expectation| expectation.return_value = Some(value))
    }

    /// Sets the value copied into the output parameter `name`.
    pub fn with_output_parameter_returning<T: Any>(self, name: &str, value: T) -> Self {
        self.with_output(name, None, value)
    }

    /// Like [`with_output_parameter_returning`](Self::with_output_parameter_returning),
    /// but the parameter must also be reported with the type tag `type_name`.
    pub fn with_output_parameter_of_type_returning<T: Any>(
        self,
        type_name: &str,
        name: &str,
        value: T,
    ) -> Self {
        self.with_output(name, Some(type_name.to_owned()), value)
    }

    fn with_output<T: Any>(self, name: &str, type_name: Option<String>, value: T) -> Self {
        let output = OutputValue {
            type_name,
            value: Rc::new(value),
        };
        self.update(|expectation| {
            expectation.outputs.insert(name.to_owned(), output);
        })
    }

    fn update(self, f: impl FnOnce(&mut Expectation)) -> Self {
        {
            let mut record = self.record.borrow_mut();
            if let Some(expectation) = record.expectations.iter_mut().find(|e| e.id == self.id) {
                f(expectation);
            }
        }
        self
    }
}

impl fmt::Debug for ExpectedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedCall").field("id", &self.id).finish()
    }
}
