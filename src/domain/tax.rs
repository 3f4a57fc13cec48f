//! Per-operation tax output.

use serde::Serialize;

use crate::domain::Decimal;

/// Tax owed for one operation. Serializes as `{"tax": <number>}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaxResult {
    pub tax: Decimal,
}

impl TaxResult {
    pub fn new(tax: Decimal) -> Self {
        Self { tax }
    }

    /// No tax owed.
    pub fn exempt() -> Self {
        Self::default()
    }
}
