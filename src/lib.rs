//! Format detection and cost estimation core for Claude Code usage logs.
//!
//! Two subsystems do the actual work: the format classifier, which decides
//! which log-schema revision produced a raw JSONL record, and the cost
//! engine, which turns token counts into a dollar estimate against a
//! per-model pricing table with fallback resolution and confidence tagging.
//!
//! File discovery, CLI handling, aggregation, and report output are the
//! caller's concern; this crate operates on in-memory values (plus the
//! line-by-line reads behind [`format::classify_file`]).

pub mod consts;
pub mod cost;
pub mod error;
pub mod format;
pub mod pricing;
pub mod usage;
pub mod utils;

pub use cost::{ConfidenceLevel, CostBreakdown, CostCalculator};
pub use error::CostError;
pub use format::{LogFormat, classify_entry, classify_file, classify_files, format_confidence};
pub use pricing::{ModelPricing, PricingTable};
pub use usage::TokenUsage;
