use crate::config::TaxRules;
use crate::domain::{Decimal, Operation, OperationKind, TaxResult};
use crate::error::TaxError;

/// Running state of the single held position within one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineState {
    /// Shares currently held. Sells are not checked against it, so it can go negative.
    pub held_quantity: Decimal,

    /// Weighted average cost per share (only meaningful when held_quantity != 0).
    pub weighted_average_cost: Decimal,

    /// Losses carried forward to offset future taxable profit.
    pub accumulated_loss: Decimal,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            held_quantity: Decimal::zero(),
            weighted_average_cost: Decimal::zero(),
            accumulated_loss: Decimal::zero(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.held_quantity.is_zero()
    }
}

pub struct TaxTracker {
    pub state: EngineState,
    rules: TaxRules,
    // 1-based position of the operation being processed.
    position: usize,
}

impl TaxTracker {
    pub fn new(rules: TaxRules) -> Self {
        Self {
            state: EngineState::new(),
            rules,
            position: 0,
        }
    }

    /// Process a single operation, updating state and returning its tax.
    ///
    /// # Errors
    /// Returns `NumericOverflow` if any intermediate amount leaves the decimal
    /// range. State is left untouched in that case.
    pub fn process_operation(&mut self, op: &Operation) -> Result<TaxResult, TaxError> {
        self.position += 1;
        let tax = match op.kind {
            OperationKind::Buy => self.handle_buy(op)?,
            OperationKind::Sell => self.handle_sell(op)?,
        };
        Ok(TaxResult::new(tax))
    }

    fn checked(&self, value: Option<Decimal>, field: &str) -> Result<Decimal, TaxError> {
        value.ok_or_else(|| TaxError::overflow(field, self.position))
    }

    fn checked_pair(
        &self,
        value: Option<(Decimal, Decimal)>,
        field: &str,
    ) -> Result<(Decimal, Decimal), TaxError> {
        value.ok_or_else(|| TaxError::overflow(field, self.position))
    }

    /// Fold the purchase into the weighted average. Buys are never taxed.
    fn handle_buy(&mut self, op: &Operation) -> Result<Decimal, TaxError> {
        let total_old = self.checked(
            self.state
                .held_quantity
                .checked_mul(self.state.weighted_average_cost),
            "cost basis",
        )?;
        let total_new = self.checked(op.total_amount(), "total amount")?;
        let new_quantity = self.checked(
            self.state.held_quantity.checked_add(op.quantity),
            "held quantity",
        )?;

        let weighted_average_cost = if new_quantity.is_positive() {
            let total = self.checked(total_old.checked_add(total_new), "cost basis")?;
            self.checked(total.checked_div(new_quantity), "weighted average")?
                .round2()
        } else {
            Decimal::zero()
        };

        self.state.weighted_average_cost = weighted_average_cost;
        self.state.held_quantity = new_quantity;
        Ok(Decimal::zero())
    }

    /// Realise a profit or loss against the weighted average.
    fn handle_sell(&mut self, op: &Operation) -> Result<Decimal, TaxError> {
        let total_amount = self.checked(op.total_amount(), "total amount")?;
        let margin = self.checked(
            op.unit_cost.checked_sub(self.state.weighted_average_cost),
            "gross profit",
        )?;
        let gross_profit = self.checked(margin.checked_mul(op.quantity), "gross profit")?;
        let held_quantity = self.checked(
            self.state.held_quantity.checked_sub(op.quantity),
            "held quantity",
        )?;

        // Losses accumulate regardless of the exemption threshold.
        let tax = if gross_profit.is_negative() {
            let loss = -gross_profit;
            let accumulated = self.checked(
                self.state.accumulated_loss.checked_add(loss),
                "accumulated loss",
            )?;
            self.state.accumulated_loss = accumulated;
            tracing::trace!(loss = %loss, accumulated = %accumulated, "Loss carried forward");
            Decimal::zero()
        } else {
            self.tax_for_profit(total_amount, gross_profit)?
        };

        self.state.held_quantity = held_quantity;
        Ok(tax)
    }

    /// Tax owed on a non-negative gross profit, consuming carried losses when taxable.
    fn tax_for_profit(
        &mut self,
        total_amount: Decimal,
        gross_profit: Decimal,
    ) -> Result<Decimal, TaxError> {
        if total_amount <= self.rules.tax_free_threshold {
            return Ok(Decimal::zero());
        }

        let (net_profit, remaining_loss) = self.checked_pair(
            apply_accumulated_loss(gross_profit, self.state.accumulated_loss),
            "net profit",
        )?;
        let tax = self.checked(compute_tax(net_profit, self.rules.tax_rate), "tax")?;
        self.state.accumulated_loss = remaining_loss;
        tracing::debug!(
            position = self.position,
            total = %total_amount,
            gross = %gross_profit,
            net = %net_profit,
            tax = %tax,
            "Taxable sale"
        );
        Ok(tax)
    }
}

/// Deduct carried losses from a non-negative `gross_profit`.
///
/// Returns `(net_profit, remaining_loss)`.
fn apply_accumulated_loss(
    gross_profit: Decimal,
    accumulated_loss: Decimal,
) -> Option<(Decimal, Decimal)> {
    if accumulated_loss >= gross_profit {
        let remaining = accumulated_loss.checked_sub(gross_profit)?;
        Some((Decimal::zero(), remaining))
    } else {
        let net = gross_profit.checked_sub(accumulated_loss)?;
        Some((net, Decimal::zero()))
    }
}

/// `round2(net_profit * rate)` for positive profit, otherwise zero. `None` on overflow.
pub fn compute_tax(net_profit: Decimal, rate: Decimal) -> Option<Decimal> {
    if net_profit.is_positive() {
        net_profit.checked_mul(rate).map(|tax| tax.round2())
    } else {
        Some(Decimal::zero())
    }
}
