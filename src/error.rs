use thiserror::Error;

/// Errors reported by mock configuration and by the expectation-tracking
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoxieError {
    /// Scope and adapters can only be changed while the mock is enabled.
    #[error("mock for `{function}` must be enabled before it can be configured")]
    NotEnabled { function: &'static str },

    /// A return value was read but none was configured for the call.
    #[error("call to `{function}` has no configured return value")]
    MissingReturnValue { function: String },

    /// The configured return value has a different kind than requested.
    #[error("call to `{function}` expected a return value of kind {expected}, but one of kind {found} was configured")]
    ReturnKind {
        function: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The configured output value does not have the parameter's type.
    #[error("output parameter `{parameter}` of `{function}` was configured with a value of another type")]
    OutputType { function: String, parameter: String },

    /// The configured output value carries a different type tag.
    #[error("output parameter `{parameter}` of `{function}` expected type `{expected}`, but `{found}` was configured")]
    OutputTag {
        function: String,
        parameter: String,
        expected: String,
        found: String,
    },
}
