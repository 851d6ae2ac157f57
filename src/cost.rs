//! Cost estimation from token counts and a pricing table.

use serde::Serialize;

use crate::consts::TOKENS_PER_MILLION;
use crate::pricing::{ModelPricing, PricingTable};
use crate::usage::TokenUsage;

/// Trust label on a computed cost.
///
/// Ordered `Low < Medium < High` so reliability checks are plain
/// comparisons: exact-match pricing clears every level, fallback pricing
/// clears Medium and Low but never High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category cost terms plus their sum. `total_cost` equals
/// [`CostCalculator::calculate_cost`] for the same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub cache_creation_cost: f64,
    pub cache_read_cost: f64,
    pub total_cost: f64,
}

/// Turns (model id, token usage) into a dollar estimate.
///
/// The pricing table is injected at construction; unknown model ids resolve
/// through the table's fallback card, so cost calculation itself never
/// fails — the only error path in the core is TokenUsage/ModelPricing
/// validation, which happens before anything reaches here.
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    pricing: PricingTable,
}

impl CostCalculator {
    pub fn new(pricing: PricingTable) -> Self {
        Self { pricing }
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn pricing_mut(&mut self) -> &mut PricingTable {
        &mut self.pricing
    }

    fn breakdown_from_pricing(usage: &TokenUsage, pricing: &ModelPricing) -> CostBreakdown {
        let input_cost =
            usage.input_tokens as f64 / TOKENS_PER_MILLION * pricing.input_price_per_million;
        let output_cost =
            usage.output_tokens as f64 / TOKENS_PER_MILLION * pricing.output_price_per_million;
        let cache_creation_cost = usage.cache_creation_tokens as f64 / TOKENS_PER_MILLION
            * pricing.cache_creation_price_per_million;
        let cache_read_cost = usage.cache_read_tokens as f64 / TOKENS_PER_MILLION
            * pricing.cache_read_price_per_million;

        CostBreakdown {
            input_cost,
            output_cost,
            cache_creation_cost,
            cache_read_cost,
            total_cost: input_cost + output_cost + cache_creation_cost + cache_read_cost,
        }
    }

    /// Total cost for one usage record. No rounding; callers round for
    /// display.
    pub fn calculate_cost(&self, model: Option<&str>, usage: &TokenUsage) -> f64 {
        self.calculate_cost_breakdown(model, usage).total_cost
    }

    /// The four cost terms exposed individually plus their sum.
    pub fn calculate_cost_breakdown(
        &self,
        model: Option<&str>,
        usage: &TokenUsage,
    ) -> CostBreakdown {
        let pricing = self.pricing.get_or_fallback(model);
        Self::breakdown_from_pricing(usage, pricing)
    }

    /// Cost plus a label saying how the pricing was resolved: High for an
    /// exact table entry, Medium for the fallback card.
    pub fn estimate_cost_with_confidence(
        &self,
        model: Option<&str>,
        usage: &TokenUsage,
    ) -> (f64, ConfidenceLevel) {
        (
            self.calculate_cost(model, usage),
            self.pricing.confidence_level(model),
        )
    }

    /// Whether a cost for `model` can be presented at `required` confidence.
    /// Fallback-derived costs never clear High.
    pub fn is_cost_reliable(&self, model: Option<&str>, required: ConfidenceLevel) -> bool {
        self.pricing.confidence_level(model) >= required
    }

    /// Model ids with exact table entries, sorted.
    pub fn supported_models(&self) -> Vec<String> {
        self.pricing.supported_models()
    }
}
