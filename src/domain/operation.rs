//! Operation records and parse-and-validate for incoming batches.
//!
//! The wire form is a JSON array of objects with `operation`, `unit-cost` and
//! `quantity` keys. Numeric fields may arrive as JSON numbers or numeric strings.

use serde_json::Value;

use crate::domain::{Decimal, OperationKind};
use crate::error::TaxError;

pub const FIELD_OPERATION: &str = "operation";
pub const FIELD_UNIT_COST: &str = "unit-cost";
pub const FIELD_QUANTITY: &str = "quantity";

/// A single validated buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub unit_cost: Decimal,
    pub quantity: Decimal,
}

impl Operation {
    pub fn new(kind: OperationKind, unit_cost: Decimal, quantity: Decimal) -> Self {
        Self {
            kind,
            unit_cost,
            quantity,
        }
    }

    pub fn buy(unit_cost: Decimal, quantity: Decimal) -> Self {
        Self::new(OperationKind::Buy, unit_cost, quantity)
    }

    pub fn sell(unit_cost: Decimal, quantity: Decimal) -> Self {
        Self::new(OperationKind::Sell, unit_cost, quantity)
    }

    /// Gross amount of the operation: `unit_cost * quantity`, or `None` on overflow.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.unit_cost.checked_mul(self.quantity)
    }
}

/// Raw numeric field as it appears on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

/// Why a raw value could not become a Decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericInputError {
    NotNumeric,
    OutOfRange,
}

impl NumericInput {
    /// Interpret the raw value as a Decimal.
    ///
    /// A finite number that rust_decimal cannot hold is `OutOfRange`.
    pub fn parse(&self) -> Result<Decimal, NumericInputError> {
        let text = match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.trim().to_string(),
            NumericInput::Other(_) => return Err(NumericInputError::NotNumeric),
        };
        if text.is_empty() {
            return Err(NumericInputError::NotNumeric);
        }

        Decimal::from_str_canonical(&text).map_err(|_| match text.parse::<f64>() {
            Ok(f) if f.is_finite() => NumericInputError::OutOfRange,
            _ => NumericInputError::NotNumeric,
        })
    }

    /// Convert the field at 1-based `position`.
    ///
    /// # Errors
    /// `InvalidNumericField` for non-numbers, `NumericOverflow` for numbers out of range.
    pub fn to_decimal(&self, field: &str, position: usize) -> Result<Decimal, TaxError> {
        self.parse().map_err(|e| match e {
            NumericInputError::NotNumeric => TaxError::invalid_numeric(field, position),
            NumericInputError::OutOfRange => TaxError::overflow(field, position),
        })
    }
}

impl From<Value> for NumericInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => NumericInput::Number(n),
            Value::String(s) => NumericInput::Text(s),
            other => NumericInput::Other(other),
        }
    }
}

/// Parse and round a raw value to two decimal places.
pub fn round2_input(value: &NumericInput) -> Result<Decimal, TaxError> {
    let field = "value".to_string();
    value.parse().map(|d| d.round2()).map_err(|e| match e {
        NumericInputError::NotNumeric => TaxError::InvalidNumericField {
            field,
            position: None,
        },
        NumericInputError::OutOfRange => TaxError::NumericOverflow {
            field,
            position: None,
        },
    })
}

/// Validate a decoded JSON batch into typed operations.
///
/// Every element is validated before any is returned, so a failure anywhere
/// rejects the whole batch.
pub fn parse_batch(value: &Value) -> Result<Vec<Operation>, TaxError> {
    let items = value
        .as_array()
        .ok_or_else(|| TaxError::InvalidInput("operations must be a list".to_string()))?;

    if items.is_empty() {
        return Err(TaxError::InvalidInput(
            "operations list must not be empty".to_string(),
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_operation(item, idx + 1))
        .collect()
}

fn parse_operation(item: &Value, position: usize) -> Result<Operation, TaxError> {
    let record = item.as_object().ok_or_else(|| {
        TaxError::InvalidInput(format!("operation at position {} must be an object", position))
    })?;

    let kind = match record.get(FIELD_OPERATION) {
        Some(Value::String(s)) => {
            s.parse::<OperationKind>()
                .map_err(|e| TaxError::UnsupportedOperation {
                    value: e.0,
                    position,
                })?
        }
        Some(other) => {
            return Err(TaxError::UnsupportedOperation {
                value: other.to_string(),
                position,
            })
        }
        None => {
            return Err(TaxError::UnsupportedOperation {
                value: "null".to_string(),
                position,
            })
        }
    };

    let unit_cost = numeric_field(record, FIELD_UNIT_COST, position)?;
    let quantity = numeric_field(record, FIELD_QUANTITY, position)?;

    Ok(Operation::new(kind, unit_cost, quantity))
}

fn numeric_field(
    record: &serde_json::Map<String, Value>,
    field: &str,
    position: usize,
) -> Result<Decimal, TaxError> {
    let raw = record
        .get(field)
        .cloned()
        .ok_or_else(|| TaxError::invalid_numeric(field, position))?;
    NumericInput::from(raw).to_decimal(field, position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_parse_batch_accepts_numbers_and_numeric_strings() {
        let batch = json!([
            {"operation": "buy", "unit-cost": 10.00, "quantity": 100},
            {"operation": "sell", "unit-cost": "15.50", "quantity": " 50 "}
        ]);

        let ops = parse_batch(&batch).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], Operation::buy(d("10"), d("100")));
        assert_eq!(ops[1], Operation::sell(d("15.5"), d("50")));
    }

    #[test]
    fn test_parse_batch_rejects_non_list() {
        let err = parse_batch(&json!({"operation": "buy"})).unwrap_err();
        assert!(matches!(err, TaxError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_batch_rejects_empty_list() {
        let err = parse_batch(&json!([])).unwrap_err();
        assert!(matches!(err, TaxError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_batch_rejects_non_object_element() {
        let err = parse_batch(&json!([42])).unwrap_err();
        match err {
            TaxError::InvalidInput(msg) => assert!(msg.contains("position 1")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_reports_value_and_position() {
        let batch = json!([
            {"operation": "buy", "unit-cost": 10, "quantity": 1},
            {"operation": "Sell", "unit-cost": 10, "quantity": 1}
        ]);
        assert_eq!(
            parse_batch(&batch).unwrap_err(),
            TaxError::UnsupportedOperation {
                value: "Sell".to_string(),
                position: 2
            }
        );
    }

    #[test]
    fn test_missing_kind_is_unsupported() {
        let batch = json!([{"unit-cost": 10, "quantity": 1}]);
        assert!(matches!(
            parse_batch(&batch).unwrap_err(),
            TaxError::UnsupportedOperation { position: 1, .. }
        ));
    }

    #[test]
    fn test_bad_numeric_fields_name_the_field() {
        let batch = json!([{"operation": "buy", "unit-cost": "abc", "quantity": 1}]);
        assert_eq!(
            parse_batch(&batch).unwrap_err(),
            TaxError::invalid_numeric("unit-cost", 1)
        );

        let batch = json!([
            {"operation": "buy", "unit-cost": 1, "quantity": 1},
            {"operation": "sell", "unit-cost": 1, "quantity": true}
        ]);
        assert_eq!(
            parse_batch(&batch).unwrap_err(),
            TaxError::invalid_numeric("quantity", 2)
        );

        let batch = json!([{"operation": "buy", "unit-cost": 1}]);
        assert_eq!(
            parse_batch(&batch).unwrap_err(),
            TaxError::invalid_numeric("quantity", 1)
        );
    }

    #[test]
    fn test_round2_input() {
        assert_eq!(
            round2_input(&NumericInput::Text("12.345".to_string())).unwrap(),
            d("12.34")
        );
        assert_eq!(
            round2_input(&NumericInput::from(json!(7.126))).unwrap(),
            d("7.13")
        );
        assert_eq!(
            round2_input(&NumericInput::Text("abc".to_string())).unwrap_err(),
            TaxError::InvalidNumericField {
                field: "value".to_string(),
                position: None
            }
        );
        assert!(round2_input(&NumericInput::from(Value::Null)).is_err());
    }

    #[test]
    fn test_out_of_range_numbers_report_overflow() {
        let batch = json!([{"operation": "buy", "unit-cost": 1e30, "quantity": 1}]);
        assert_eq!(
            parse_batch(&batch).unwrap_err(),
            TaxError::overflow("unit-cost", 1)
        );

        let batch = json!([{"operation": "buy", "unit-cost": 1, "quantity": "-1e40"}]);
        assert_eq!(
            parse_batch(&batch).unwrap_err(),
            TaxError::overflow("quantity", 1)
        );

        assert_eq!(
            round2_input(&NumericInput::Text("1e30".to_string())).unwrap_err(),
            TaxError::NumericOverflow {
                field: "value".to_string(),
                position: None
            }
        );
    }

    #[test]
    fn test_non_finite_strings_are_not_numeric() {
        for raw in ["NaN", "inf", "-infinity"] {
            assert_eq!(
                NumericInput::Text(raw.to_string()).parse(),
                Err(NumericInputError::NotNumeric),
                "{}",
                raw
            );
        }
    }

    #[test]
    fn test_total_amount() {
        let op = Operation::sell(d("20"), d("5000"));
        assert_eq!(op.kind, OperationKind::Sell);
        assert_eq!(op.total_amount(), Some(d("100000")));

        let huge = Operation::buy(d("1000000000000000"), d("1000000000000000"));
        assert_eq!(huge.total_amount(), None);
    }
}
