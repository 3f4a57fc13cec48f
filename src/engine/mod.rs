//! Pure computation engine for capital-gains tax.

pub mod tax_tracker;

use serde_json::Value;

use crate::config::TaxRules;
use crate::domain::{parse_batch, Operation, TaxResult};
use crate::error::TaxError;

pub use tax_tracker::{EngineState, TaxTracker};

/// Folds batches of operations into per-operation taxes.
///
/// Holds only immutable rules; every call starts from a fresh `EngineState`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxEngine {
    rules: TaxRules,
}

impl TaxEngine {
    pub fn new(rules: TaxRules) -> Self {
        Self { rules }
    }

    /// Compute one `TaxResult` per operation, in input order.
    ///
    /// # Errors
    /// Returns `NumericOverflow` for the first operation whose amounts leave the
    /// decimal range; no results are returned in that case.
    pub fn process(&self, operations: &[Operation]) -> Result<Vec<TaxResult>, TaxError> {
        let mut tracker = TaxTracker::new(self.rules);
        operations
            .iter()
            .map(|op| tracker.process_operation(op))
            .collect()
    }

    /// Validate a decoded JSON batch, then process it.
    ///
    /// # Errors
    /// Returns the first validation or overflow failure; no partial results.
    pub fn process_json(&self, batch: &Value) -> Result<Vec<TaxResult>, TaxError> {
        let operations = parse_batch(batch)?;
        self.process(&operations)
    }
}
