use serde::Serialize;
use serde_json::{Value, json};

use crate::error::CostError;

/// Rate card for one model, in currency units per million tokens.
///
/// `cache_read_price_per_million` defaults to 0.0; not every rate source
/// reports a cache-read discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPricing {
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
    pub cache_creation_price_per_million: f64,
    pub cache_read_price_per_million: f64,
}

impl ModelPricing {
    pub fn new(
        input_price_per_million: f64,
        output_price_per_million: f64,
        cache_creation_price_per_million: f64,
        cache_read_price_per_million: f64,
    ) -> Result<Self, CostError> {
        let checked = [
            ("input_price_per_million", input_price_per_million),
            ("output_price_per_million", output_price_per_million),
            (
                "cache_creation_price_per_million",
                cache_creation_price_per_million,
            ),
            ("cache_read_price_per_million", cache_read_price_per_million),
        ];
        for (field, rate) in checked {
            if rate < 0.0 {
                return Err(CostError::NegativeRate { field });
            }
        }
        Ok(Self {
            input_price_per_million,
            output_price_per_million,
            cache_creation_price_per_million,
            cache_read_price_per_million,
        })
    }

    /// Builds a rate card from an untyped JSON object.
    ///
    /// The input, output, and cache-creation rates are required and reported
    /// by name when absent; the cache-read rate defaults to 0.0.
    pub fn from_value(value: &Value) -> Result<Self, CostError> {
        let required = |field: &'static str| {
            value
                .get(field)
                .and_then(Value::as_f64)
                .ok_or(CostError::MissingField { field })
        };

        let input = required("input_price_per_million")?;
        let output = required("output_price_per_million")?;
        let cache_creation = required("cache_creation_price_per_million")?;
        let cache_read = value
            .get("cache_read_price_per_million")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Self::new(input, output, cache_creation, cache_read)
    }

    /// Structural inverse of [`ModelPricing::from_value`]; all four fields
    /// round-trip.
    pub fn to_value(&self) -> Value {
        json!({
            "input_price_per_million": self.input_price_per_million,
            "output_price_per_million": self.output_price_per_million,
            "cache_creation_price_per_million": self.cache_creation_price_per_million,
            "cache_read_price_per_million": self.cache_read_price_per_million,
        })
    }
}
