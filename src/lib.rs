pub mod config;
pub mod domain;
pub mod driver;
pub mod engine;
pub mod error;

pub use config::{Config, TaxRules};
pub use domain::{Decimal, Operation, OperationKind, TaxResult};
pub use engine::{EngineState, TaxEngine, TaxTracker};
pub use error::{AppError, TaxError};
