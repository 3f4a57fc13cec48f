//! Domain types for the capital-gains engine.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - OperationKind primitive
//! - Operation records with parse-and-validate from wire JSON
//! - TaxResult output records

pub mod decimal;
pub mod operation;
pub mod primitives;
pub mod tax;

pub use decimal::Decimal;
pub use operation::{parse_batch, round2_input, NumericInput, NumericInputError, Operation};
pub use primitives::{OperationKind, UnknownOperationKind};
pub use tax::TaxResult;
