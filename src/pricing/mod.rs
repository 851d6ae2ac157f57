mod table;
mod types;

pub use table::PricingTable;
pub use types::ModelPricing;
