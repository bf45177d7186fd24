use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::MoxieError;

use super::expectation::Expectation;
use super::params::OutputTarget;
use super::value::{FromValue, Parameter, Value};
use super::ScopeRecord;

/// One intercepted call, as reported to the collaborator.
///
/// Parameters are appended to the call record of the owning scope as they are
/// reported. The return value and output parameter values come from the
/// expectation the call consumed, if any.
///
/// Reporting methods panic when a configured output value does not fit the
/// parameter, and the `*_return_value` accessors panic when the configured
/// return value is missing or has another kind. Use
/// [`try_return_as`](Self::try_return_as) for the fallible form.
pub struct ActualCall {
    function: String,
    record: Rc<RefCell<ScopeRecord>>,
    // Generation of the scope and position of the call record in it.
    slot: (u64, usize),
    expectation: Option<Expectation>,
}

impl ActualCall {
    pub(crate) fn new(
        function: &str,
        record: Rc<RefCell<ScopeRecord>>,
        slot: (u64, usize),
        expectation: Option<Expectation>,
    ) -> Self {
        Self {
            function: function.to_owned(),
            record,
            slot,
            expectation,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function
    }

    fn push(&mut self, name: &str, value: Value) -> &mut Self {
        let (generation, index) = self.slot;
        let mut record = self.record.borrow_mut();
        // The scope may have been cleared while the call was in flight.
        let current = record.generation == generation;
        if let Some(call) = record.calls.get_mut(index).filter(|_| current) {
            call.parameters.push(Parameter {
                name: name.to_owned(),
                value,
            });
        }
        drop(record);
        self
    }

    pub fn with_bool_parameter(&mut self, name: &str, value: bool) -> &mut Self {
        self.push(name, Value::Bool(value))
    }

    pub fn with_int_parameter(&mut self, name: &str, value: i32) -> &mut Self {
        self.push(name, Value::Int(value))
    }

    pub fn with_unsigned_int_parameter(&mut self, name: &str, value: u32) -> &mut Self {
        self.push(name, Value::UInt(value))
    }

    pub fn with_long_int_parameter(&mut self, name: &str, value: i64) -> &mut Self {
        self.push(name, Value::Long(value))
    }

    pub fn with_unsigned_long_int_parameter(&mut self, name: &str, value: u64) -> &mut Self {
        self.push(name, Value::ULong(value))
    }

    pub fn with_double_parameter(&mut self, name: &str, value: f64) -> &mut Self {
        self.push(name, Value::Double(value))
    }

    pub fn with_string_parameter(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.push(name, Value::String(value.into()))
    }

    pub fn with_pointer_parameter(&mut self, name: &str, address: usize) -> &mut Self {
        self.push(name, Value::Pointer(address))
    }

    /// Reports an input pointer together with the pointee type tag.
    pub fn with_parameter_of_type(&mut self, type_name: &str, name: &str, address: usize) -> &mut Self {
        self.push(
            name,
            Value::Object {
                type_name: type_name.to_owned(),
                address,
            },
        )
    }

    /// Reports an output parameter and copies the configured value, if any,
    /// into `target`. A slice target receives the leading elements of a
    /// configured `Vec`.
    ///
    /// # Panics
    ///
    /// When the configured value is not a `T`.
    #[track_caller]
    pub fn with_output_parameter<T: OutputTarget + ?Sized>(
        &mut self,
        name: &str,
        target: &mut T,
    ) -> &mut Self {
        self.push(name, Value::Output { type_name: None });
        self.write_output(None, name, target);
        self
    }

    /// Reports a typed output parameter and copies the configured value, if
    /// any, into `target`.
    ///
    /// # Panics
    ///
    /// When the configured value carries another type tag or is not a `T`.
    #[track_caller]
    pub fn with_output_parameter_of_type<T: OutputTarget + ?Sized>(
        &mut self,
        type_name: &str,
        name: &str,
        target: &mut T,
    ) -> &mut Self {
        self.push(
            name,
            Value::Output {
                type_name: Some(type_name.to_owned()),
            },
        );
        self.write_output(Some(type_name), name, target);
        self
    }

    #[track_caller]
    fn write_output<T: OutputTarget + ?Sized>(
        &self,
        type_name: Option<&str>,
        name: &str,
        target: &mut T,
    ) {
        let Some(output) = self.expectation.as_ref().and_then(|e| e.output(name)) else {
            return;
        };
        if let (Some(expected), Some(found)) = (type_name, output.type_name.as_deref()) {
            if expected != found {
                let err = MoxieError::OutputTag {
                    function: self.function.clone(),
                    parameter: name.to_owned(),
                    expected: expected.to_owned(),
                    found: found.to_owned(),
                };
                panic!("{err}");
            }
        }
        if !target.write_from(&*output.value) {
            let err = MoxieError::OutputType {
                function: self.function.clone(),
                parameter: name.to_owned(),
            };
            panic!("{err}");
        }
    }

    pub fn has_return_value(&self) -> bool {
        self.return_value().is_some()
    }

    pub fn return_value(&self) -> Option<&Value> {
        self.expectation.as_ref()?.return_value.as_ref()
    }

    /// The configured return value converted to `T`.
    pub fn try_return_as<T: FromValue>(&self) -> Result<T, MoxieError> {
        let value = self.return_value().ok_or_else(|| MoxieError::MissingReturnValue {
            function: self.function.clone(),
        })?;
        T::from_value(value).ok_or_else(|| MoxieError::ReturnKind {
            function: self.function.clone(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    #[track_caller]
    fn return_as<T: FromValue>(&self) -> T {
        match self.try_return_as() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    #[track_caller]
    pub fn bool_return_value(&self) -> bool {
        self.return_as()
    }

    #[track_caller]
    pub fn int_return_value(&self) -> i32 {
        self.return_as()
    }

    #[track_caller]
    pub fn unsigned_int_return_value(&self) -> u32 {
        self.return_as()
    }

    #[track_caller]
    pub fn long_int_return_value(&self) -> i64 {
        self.return_as()
    }

    #[track_caller]
    pub fn unsigned_long_int_return_value(&self) -> u64 {
        self.return_as()
    }

    #[track_caller]
    pub fn double_return_value(&self) -> f64 {
        self.return_as()
    }

    #[track_caller]
    pub fn string_return_value(&self) -> String {
        self.return_as()
    }

    #[track_caller]
    pub fn pointer_return_value(&self) -> usize {
        self.return_as()
    }
}

impl fmt::Debug for ActualCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActualCall")
            .field("function", &self.function)
            .field("expectation", &self.expectation)
            .finish()
    }
}
