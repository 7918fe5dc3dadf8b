use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::business::UserBusiness;
use crate::metrics::profit::calculate_profit_margin;
use crate::types::{Money, Percent};
use crate::{LucroRealError, LucroRealResult};

/// Tolerance when checking a supplied snapshot against its own totals.
const CONSISTENCY_TOLERANCE: Decimal = dec!(0.01);

/// One reporting period of a business, reduced to scalar totals.
///
/// Snapshots are values: build a new one instead of editing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub month: String,
    pub revenue: Money,
    pub total_fixed_costs: Money,
    pub total_variable_costs: Money,
    pub pro_labore: Money,
    pub real_profit: Money,
    pub profit_margin: Percent,
}

impl FinancialSnapshot {
    /// Build a snapshot from totals, deriving profit and margin.
    pub fn from_totals(
        month: impl Into<String>,
        revenue: Money,
        total_fixed_costs: Money,
        total_variable_costs: Money,
        pro_labore: Money,
    ) -> Self {
        let real_profit = revenue
            .saturating_sub(total_fixed_costs)
            .saturating_sub(total_variable_costs)
            .saturating_sub(pro_labore);
        Self {
            month: month.into(),
            revenue,
            total_fixed_costs,
            total_variable_costs,
            pro_labore,
            real_profit,
            profit_margin: calculate_profit_margin(real_profit, revenue),
        }
    }

    /// Like [`FinancialSnapshot::from_totals`] but rejects negative inputs.
    pub fn try_new(
        month: impl Into<String>,
        revenue: Money,
        total_fixed_costs: Money,
        total_variable_costs: Money,
        pro_labore: Money,
    ) -> LucroRealResult<Self> {
        for (field, value) in [
            ("revenue", revenue),
            ("total_fixed_costs", total_fixed_costs),
            ("total_variable_costs", total_variable_costs),
            ("pro_labore", pro_labore),
        ] {
            if value < Decimal::ZERO {
                return Err(LucroRealError::InvalidInput {
                    field: field.into(),
                    reason: "Must be zero or positive.".into(),
                });
            }
        }
        Ok(Self::from_totals(
            month,
            revenue,
            total_fixed_costs,
            total_variable_costs,
            pro_labore,
        ))
    }

    /// Reduce a business's cost structure into a snapshot for `month`.
    pub fn from_business(business: &UserBusiness, month: impl Into<String>) -> Self {
        Self::from_totals(
            month,
            business.monthly_revenue,
            business.total_fixed_costs(),
            business.total_variable_costs(),
            business.pro_labore,
        )
    }

    /// Share of revenue consumed by fixed costs, in points. `None` when
    /// there is no revenue to compare against.
    pub fn fixed_cost_share(&self) -> Option<Percent> {
        share_of_revenue(self.total_fixed_costs, self.revenue)
    }

    /// Share of revenue consumed by variable costs, in points.
    pub fn variable_cost_share(&self) -> Option<Percent> {
        share_of_revenue(self.total_variable_costs, self.revenue)
    }

    /// Whether the stored profit and margin agree with the stored totals.
    pub fn is_consistent(&self) -> bool {
        let expected = Self::from_totals(
            self.month.clone(),
            self.revenue,
            self.total_fixed_costs,
            self.total_variable_costs,
            self.pro_labore,
        );
        expected.real_profit.saturating_sub(self.real_profit).abs() <= CONSISTENCY_TOLERANCE
            && expected.profit_margin.saturating_sub(self.profit_margin).abs() <= CONSISTENCY_TOLERANCE
    }
}

fn share_of_revenue(amount: Money, revenue: Money) -> Option<Percent> {
    if revenue.is_zero() {
        None
    } else {
        Some(
            amount
                .checked_div(revenue)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::MAX),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_totals_derives_profit_and_margin() {
        let s = FinancialSnapshot::from_totals("2024-05", dec!(10000), dec!(6000), dec!(1000), dec!(1000));
        assert_eq!(s.real_profit, dec!(2000));
        assert_eq!(s.profit_margin, dec!(20));
        assert!(s.is_consistent());
    }

    #[test]
    fn test_zero_revenue_margin_is_zero() {
        let s = FinancialSnapshot::from_totals("2024-05", Decimal::ZERO, dec!(500), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(s.real_profit, dec!(-500));
        assert_eq!(s.profit_margin, Decimal::ZERO);
        assert_eq!(s.fixed_cost_share(), None);
    }

    #[test]
    fn test_shares() {
        let s = FinancialSnapshot::from_totals("2024-05", dec!(8000), dec!(2000), dec!(4000), dec!(0));
        assert_eq!(s.fixed_cost_share(), Some(dec!(25)));
        assert_eq!(s.variable_cost_share(), Some(dec!(50)));
    }

    #[test]
    fn test_extreme_totals_saturate() {
        let fixed = Decimal::from_scientific("1e27").unwrap();
        let s = FinancialSnapshot::from_totals("2024-05", dec!(0.01), fixed, Decimal::ZERO, dec!(2000));
        assert!(s.real_profit < -fixed + dec!(1));
        assert_eq!(s.profit_margin, Decimal::MIN);
        assert_eq!(s.fixed_cost_share(), Some(Decimal::MAX));
    }

    #[test]
    fn test_try_new_rejects_negative_totals() {
        let err = FinancialSnapshot::try_new("2024-05", dec!(100), dec!(-1), dec!(0), dec!(0)).unwrap_err();
        match err {
            LucroRealError::InvalidInput { field, .. } => assert_eq!(field, "total_fixed_costs"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_tampered_snapshot_is_inconsistent() {
        let mut s = FinancialSnapshot::from_totals("2024-05", dec!(10000), dec!(6000), dec!(1000), dec!(1000));
        s.real_profit = dec!(5000);
        assert!(!s.is_consistent());
    }
}
