use std::fmt;

/// A parameter or return value as seen by the expectation-tracking
/// collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Double(f64),
    String(String),
    /// An address compared by identity.
    Pointer(usize),
    /// An address tagged with the pointee type.
    Object { type_name: String, address: usize },
    /// An output location; the value written back is not recorded.
    Output { type_name: Option<String> },
}

impl Value {
    /// Address of `ptr`, dropping any pointer metadata.
    pub fn pointer<T: ?Sized>(ptr: *const T) -> Self {
        Value::Pointer(ptr.cast::<()>() as usize)
    }

    /// Human readable kind, used in mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "unsigned int",
            Value::Long(_) => "long int",
            Value::ULong(_) => "unsigned long int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Pointer(_) => "pointer",
            Value::Object { .. } => "object",
            Value::Output { .. } => "output",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::ULong(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Pointer(v) => write!(f, "{v:#x}"),
            Value::Object { type_name, address } => write!(f, "{type_name}@{address:#x}"),
            Value::Output { type_name: Some(type_name) } => write!(f, "<output {type_name}>"),
            Value::Output { type_name: None } => f.write_str("<output>"),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident as $kind:literal),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl FromValue for $ty {
                const KIND: &'static str = $kind;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

/// Conversion from a configured [`Value`] into a concrete return type.
pub trait FromValue: Sized {
    /// Kind name reported when the configured value does not match.
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl_from_value! {
    bool => Bool as "bool",
    i32 => Int as "int",
    u32 => UInt as "unsigned int",
    i64 => Long as "long int",
    u64 => ULong as "unsigned long int",
    f64 => Double as "double",
    String => String as "string",
    usize => Pointer as "pointer",
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

/// One reported parameter of an actual call.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
}

/// An actual call recorded by a [`MockSupport`](super::MockSupport) scope.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub function: String,
    pub parameters: Vec<Parameter>,
}

impl CallRecord {
    pub(crate) fn new(function: &str) -> Self {
        Self {
            function: function.to_owned(),
            parameters: Vec::new(),
        }
    }

    /// The value reported for the parameter called `name`, if any.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}
