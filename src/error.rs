use thiserror::Error;

/// Failures raised by the validation gates. Classification and cost math
/// themselves never fail; unknown models resolve through fallback pricing
/// and are deliberately not an error case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CostError {
    #[error("{field} cannot be negative")]
    NegativeTokens { field: &'static str },

    #[error("At least one of input_tokens, output_tokens, or cache_creation_tokens must be positive")]
    ZeroUsage,

    #[error("{field} cannot be negative")]
    NegativeRate { field: &'static str },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Model name cannot be empty")]
    BlankModelName,
}
