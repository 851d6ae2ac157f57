//! Shared constants.

/// Rates are quoted per million tokens; every cost term divides by this.
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Model whose rate card stands in for unknown model ids. Mid-tier by
/// design: a zero card would silently understate every fallback cost.
pub const FALLBACK_MODEL: &str = "claude-3-sonnet";
