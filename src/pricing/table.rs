use std::collections::HashMap;

use serde_json::{Map, Value};

use super::types::ModelPricing;
use crate::consts::FALLBACK_MODEL;
use crate::cost::ConfidenceLevel;
use crate::error::CostError;

/// Registry of per-model rate cards.
///
/// Seeded with the built-in rate set; entries may be added or overwritten at
/// runtime (last write wins). Lookups are string-exact, no normalization.
/// Unknown models never surface as absence: [`PricingTable::get_or_fallback`]
/// substitutes the mid-tier card instead, and the confidence machinery
/// records that the number came from fallback.
///
/// Writes go through `&mut self`; callers sharing one table across threads
/// put their own lock around it.
#[derive(Debug, Clone)]
pub struct PricingTable {
    models: HashMap<String, ModelPricing>,
}

fn rate(input: f64, output: f64, cache_creation: f64, cache_read: f64) -> ModelPricing {
    ModelPricing {
        input_price_per_million: input,
        output_price_per_million: output,
        cache_creation_price_per_million: cache_creation,
        cache_read_price_per_million: cache_read,
    }
}

impl Default for PricingTable {
    /// Table pre-seeded with the built-in rate set (USD per million tokens).
    fn default() -> Self {
        let mut models = HashMap::new();
        models.insert("claude-3-haiku".to_string(), rate(0.25, 1.25, 0.3, 0.03));
        models.insert("claude-3-5-haiku".to_string(), rate(0.8, 4.0, 1.0, 0.08));
        models.insert("claude-3-sonnet".to_string(), rate(3.0, 15.0, 3.75, 0.3));
        models.insert("claude-3-5-sonnet".to_string(), rate(3.0, 15.0, 3.75, 0.3));
        models.insert(
            "claude-3-7-sonnet-20250219".to_string(),
            rate(3.0, 15.0, 3.75, 0.3),
        );
        models.insert("claude-3-opus".to_string(), rate(15.0, 75.0, 18.75, 1.5));
        models.insert("claude-sonnet-4".to_string(), rate(15.0, 75.0, 18.75, 1.5));
        models.insert(
            "claude-sonnet-4-20250514".to_string(),
            rate(15.0, 75.0, 18.75, 1.5),
        );
        Self { models }
    }
}

impl PricingTable {
    /// Empty registry, no built-in rates. Most callers want `default()`.
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Exact-match lookup.
    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.models.get(model)
    }

    /// Exact-match lookup, substituting the mid-tier fallback card when the
    /// model is unknown, empty, or absent. Never reports absence.
    pub fn get_or_fallback(&self, model: Option<&str>) -> &ModelPricing {
        model
            .and_then(|m| self.models.get(m))
            .or_else(|| self.models.get(FALLBACK_MODEL))
            .unwrap_or(&FALLBACK_RATE)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Inserts or overwrites one rate card. Blank or whitespace-only names
    /// are rejected.
    pub fn update(&mut self, model: &str, pricing: ModelPricing) -> Result<(), CostError> {
        if model.trim().is_empty() {
            return Err(CostError::BlankModelName);
        }
        self.models.insert(model.to_string(), pricing);
        Ok(())
    }

    /// Bulk-applies a name -> rate-card mapping, one entry at a time.
    ///
    /// Fails fast on the first invalid entry; entries applied before the
    /// failure stay applied (no rollback).
    pub fn load_from_map(&mut self, entries: &Map<String, Value>) -> Result<(), CostError> {
        for (model, card) in entries {
            let pricing = ModelPricing::from_value(card)?;
            self.update(model, pricing)?;
        }
        Ok(())
    }

    /// Exactly-known model ids, sorted.
    pub fn supported_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.models.keys().cloned().collect();
        models.sort();
        models
    }

    /// High for an exact entry, Medium for anything resolved via fallback.
    /// Low is reserved for callers that designate low-trust tiers themselves.
    pub fn confidence_level(&self, model: Option<&str>) -> ConfidenceLevel {
        match model {
            Some(m) if self.models.contains_key(m) => ConfidenceLevel::High,
            _ => ConfidenceLevel::Medium,
        }
    }
}

/// Last-resort card matching the mid-tier rates, for tables built with
/// `empty()` that also lack a fallback entry.
static FALLBACK_RATE: ModelPricing = ModelPricing {
    input_price_per_million: 3.0,
    output_price_per_million: 15.0,
    cache_creation_price_per_million: 3.75,
    cache_read_price_per_million: 0.3,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_table_has_reference_models() {
        let table = PricingTable::default();
        assert!(table.contains("claude-sonnet-4"));
        assert!(table.contains("claude-3-sonnet"));
        assert!(table.contains("claude-3-haiku"));
        assert!(table.supported_models().len() >= 6);
    }

    #[test]
    fn reference_model_rates() {
        let table = PricingTable::default();

        let sonnet4 = table.get("claude-sonnet-4").unwrap();
        assert_eq!(sonnet4.input_price_per_million, 15.0);
        assert_eq!(sonnet4.output_price_per_million, 75.0);

        let haiku = table.get("claude-3-haiku").unwrap();
        assert_eq!(haiku.input_price_per_million, 0.25);
        assert_eq!(haiku.output_price_per_million, 1.25);

        let sonnet = table.get("claude-3-sonnet").unwrap();
        assert_eq!(sonnet.input_price_per_million, 3.0);
        assert_eq!(sonnet.output_price_per_million, 15.0);
    }

    #[test]
    fn unknown_model_lookup_is_none() {
        let table = PricingTable::default();
        assert!(table.get("non-existent-model").is_none());
    }

    #[test]
    fn fallback_resolves_to_mid_tier_card() {
        let table = PricingTable::default();

        let exact = table.get_or_fallback(Some("claude-3-sonnet"));
        assert_eq!(exact.input_price_per_million, 3.0);

        let fallback = table.get_or_fallback(Some("non-existent-model"));
        assert_eq!(fallback.input_price_per_million, 3.0);
        assert_eq!(fallback.output_price_per_million, 15.0);

        let absent = table.get_or_fallback(None);
        assert_eq!(absent.input_price_per_million, 3.0);
    }

    #[test]
    fn empty_table_still_never_reports_absence() {
        let table = PricingTable::empty();
        let pricing = table.get_or_fallback(Some("anything"));
        assert_eq!(pricing.input_price_per_million, 3.0);
        assert_eq!(pricing.output_price_per_million, 15.0);
    }

    #[test]
    fn update_inserts_and_overwrites() {
        let mut table = PricingTable::default();
        let custom = ModelPricing::new(5.0, 25.0, 6.25, 0.5).unwrap();
        table.update("custom-model", custom).unwrap();
        assert_eq!(
            table.get("custom-model").unwrap().input_price_per_million,
            5.0
        );

        // Last write wins
        let replacement = ModelPricing::new(7.5, 37.5, 9.375, 0.75).unwrap();
        table.update("custom-model", replacement).unwrap();
        assert_eq!(
            table.get("custom-model").unwrap().input_price_per_million,
            7.5
        );
        assert!(table.contains("custom-model"));
        assert!(table.supported_models().contains(&"custom-model".to_string()));
    }

    #[test]
    fn blank_names_rejected() {
        let mut table = PricingTable::default();
        let pricing = ModelPricing::new(5.0, 25.0, 6.25, 0.0).unwrap();
        assert_eq!(
            table.update("", pricing.clone()),
            Err(CostError::BlankModelName)
        );
        assert_eq!(table.update("   ", pricing), Err(CostError::BlankModelName));
    }

    #[test]
    fn load_from_map_applies_all_entries() {
        let mut table = PricingTable::default();
        let entries = json!({
            "custom-model-1": {
                "input_price_per_million": 10.0,
                "output_price_per_million": 50.0,
                "cache_creation_price_per_million": 12.5,
                "cache_read_price_per_million": 1.0,
            },
            "custom-model-2": {
                "input_price_per_million": 1.0,
                "output_price_per_million": 5.0,
                "cache_creation_price_per_million": 1.25,
            },
        });
        table
            .load_from_map(entries.as_object().unwrap())
            .unwrap();

        assert_eq!(
            table.get("custom-model-1").unwrap().output_price_per_million,
            50.0
        );
        // Missing cache-read rate defaults to 0.0
        assert_eq!(
            table.get("custom-model-2").unwrap().cache_read_price_per_million,
            0.0
        );
    }

    #[test]
    fn load_from_map_fails_fast_keeping_earlier_entries() {
        let mut table = PricingTable::default();
        // serde_json's Map iterates keys in sorted order, so the valid
        // entry is applied before the invalid one surfaces
        let entries = json!({
            "alpha-model": {
                "input_price_per_million": 10.0,
                "output_price_per_million": 50.0,
                "cache_creation_price_per_million": 12.5,
            },
            "omega-model": {
                "input_price_per_million": 10.0,
                "cache_creation_price_per_million": 12.5,
            },
        });
        let err = table
            .load_from_map(entries.as_object().unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            CostError::MissingField {
                field: "output_price_per_million"
            }
        );
        assert!(table.contains("alpha-model"));
        assert!(!table.contains("omega-model"));
    }

    #[test]
    fn confidence_level_exact_vs_fallback() {
        let table = PricingTable::default();
        assert_eq!(
            table.confidence_level(Some("claude-3-sonnet")),
            ConfidenceLevel::High
        );
        assert_eq!(
            table.confidence_level(Some("non-existent-model")),
            ConfidenceLevel::Medium
        );
        assert_eq!(table.confidence_level(None), ConfidenceLevel::Medium);
    }
}
