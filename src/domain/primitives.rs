//! Domain primitives: OperationKind.

use std::str::FromStr;

/// Kind of market operation: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Adds shares to the position and moves the weighted average.
    Buy,
    /// Removes shares from the position and may realise a profit or loss.
    Sell,
}

impl OperationKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Buy => "buy",
            OperationKind::Sell => "sell",
        }
    }
}

/// Unknown operation kind. Carries the rejected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperationKind(pub String);

impl FromStr for OperationKind {
    type Err = UnknownOperationKind;

    /// Exact, case-sensitive match on `buy` / `sell`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(OperationKind::Buy),
            "sell" => Ok(OperationKind::Sell),
            other => Err(UnknownOperationKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
