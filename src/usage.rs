//! Validated token counts for one assistant turn.

use serde::Serialize;

use crate::error::CostError;

/// Token consumption of a single assistant turn.
///
/// Constructed once from extracted log fields and immutable afterwards.
/// `cache_read_tokens` is a discount-priced re-read, not new work, so it is
/// excluded from [`TokenUsage::total_tokens`] and from the must-be-positive
/// rule: a record that is pure cache-read does not justify a usage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
}

impl TokenUsage {
    /// Validates and builds a usage record.
    ///
    /// Counts arrive as `i64` because upstream JSON is untrusted; the first
    /// negative field is reported by name. All of input, output, and
    /// cache_creation zero is rejected as [`CostError::ZeroUsage`].
    pub fn new(
        input_tokens: i64,
        output_tokens: i64,
        cache_creation_tokens: i64,
        cache_read_tokens: i64,
    ) -> Result<Self, CostError> {
        let checked = [
            ("input_tokens", input_tokens),
            ("output_tokens", output_tokens),
            ("cache_creation_tokens", cache_creation_tokens),
            ("cache_read_tokens", cache_read_tokens),
        ];
        for (field, value) in checked {
            if value < 0 {
                return Err(CostError::NegativeTokens { field });
            }
        }
        if input_tokens == 0 && output_tokens == 0 && cache_creation_tokens == 0 {
            return Err(CostError::ZeroUsage);
        }
        Ok(Self {
            input_tokens: input_tokens as u64,
            output_tokens: output_tokens as u64,
            cache_creation_tokens: cache_creation_tokens as u64,
            cache_read_tokens: cache_read_tokens as u64,
        })
    }

    /// Billable new work: input + output + cache_creation. Saturates at
    /// `u64::MAX` rather than wrapping on absurd counts.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.cache_creation_tokens)
    }

    /// Everything the turn touched, cache re-reads included.
    pub fn total_tokens_including_cache_read(&self) -> u64 {
        self.total_tokens().saturating_add(self.cache_read_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_usage() {
        let usage = TokenUsage::new(1000, 500, 200, 1500).unwrap();
        assert_eq!(usage.input_tokens, 1000);
        assert_eq!(usage.output_tokens, 500);
        assert_eq!(usage.cache_creation_tokens, 200);
        assert_eq!(usage.cache_read_tokens, 1500);
    }

    #[test]
    fn negative_fields_rejected_by_name() {
        let cases = [
            (TokenUsage::new(-1, 500, 0, 0), "input_tokens"),
            (TokenUsage::new(1000, -1, 0, 0), "output_tokens"),
            (TokenUsage::new(1000, 500, -1, 0), "cache_creation_tokens"),
            (TokenUsage::new(1000, 500, 0, -1), "cache_read_tokens"),
        ];
        for (result, field) in cases {
            assert_eq!(result, Err(CostError::NegativeTokens { field }));
        }
    }

    #[test]
    fn first_offending_field_wins() {
        let err = TokenUsage::new(-1, -2, -3, -4).unwrap_err();
        assert_eq!(
            err,
            CostError::NegativeTokens {
                field: "input_tokens"
            }
        );
    }

    #[test]
    fn all_zero_work_rejected() {
        assert_eq!(TokenUsage::new(0, 0, 0, 0), Err(CostError::ZeroUsage));
        // Pure cache-read is still zero real work
        assert_eq!(TokenUsage::new(0, 0, 0, 9000), Err(CostError::ZeroUsage));
    }

    #[test]
    fn single_positive_category_is_enough() {
        assert!(TokenUsage::new(1, 0, 0, 0).is_ok());
        assert!(TokenUsage::new(0, 1, 0, 0).is_ok());
        assert!(TokenUsage::new(0, 0, 1, 0).is_ok());
    }

    #[test]
    fn totals() {
        let usage = TokenUsage::new(1000, 500, 200, 1500).unwrap();
        assert_eq!(usage.total_tokens(), 1700);
        assert_eq!(usage.total_tokens_including_cache_read(), 3200);
    }

    #[test]
    fn totals_saturate_on_extreme_counts() {
        let usage = TokenUsage::new(i64::MAX, i64::MAX, i64::MAX, i64::MAX).unwrap();
        assert_eq!(usage.total_tokens(), u64::MAX);
        assert_eq!(usage.total_tokens_including_cache_read(), u64::MAX);
    }

    #[test]
    fn serializes_to_flat_object() {
        let usage = TokenUsage::new(1000, 500, 200, 1500).unwrap();
        assert_eq!(
            serde_json::to_value(usage).unwrap(),
            json!({
                "input_tokens": 1000,
                "output_tokens": 500,
                "cache_creation_tokens": 200,
                "cache_read_tokens": 1500,
            })
        );
    }
}
