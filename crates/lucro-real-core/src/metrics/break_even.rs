use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::business::{self, FixedCost, VariableCost};
use crate::types::{Money, Percent};

/// Break-even revenue, or the absence of one.
///
/// `Unreachable` means variable costs eat 100% or more of every sale, so no
/// revenue volume ever covers fixed costs and pró-labore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    Reachable(Money),
    Unreachable,
}

impl BreakEven {
    pub fn is_reachable(&self) -> bool {
        matches!(self, BreakEven::Reachable(_))
    }

    pub fn revenue(&self) -> Option<Money> {
        match self {
            BreakEven::Reachable(revenue) => Some(*revenue),
            BreakEven::Unreachable => None,
        }
    }

    /// Break-even as a share of `revenue`, in points. `None` when either
    /// side has no finite value to compare.
    pub fn share_of(&self, revenue: Money) -> Option<Percent> {
        match self {
            BreakEven::Reachable(be) if !revenue.is_zero() => be
                .checked_div(revenue)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
            _ => None,
        }
    }
}

/// Contribution margin as a fraction: `1 - Σ percentages / 100`.
pub fn contribution_margin(variable_costs: &[VariableCost]) -> Decimal {
    Decimal::ONE - business::total_variable_percentage(variable_costs) / Decimal::ONE_HUNDRED
}

/// Revenue at which real profit is zero: `(fixed + pró-labore) / CM`.
pub fn calculate_break_even(
    fixed_costs: &[FixedCost],
    variable_costs: &[VariableCost],
    pro_labore: Money,
) -> BreakEven {
    break_even_from_totals(
        business::total_fixed(fixed_costs),
        business::total_variable_percentage(variable_costs),
        pro_labore,
    )
}

/// Same as [`calculate_break_even`] with the cost lists already summed.
pub fn break_even_from_totals(
    total_fixed: Money,
    total_variable_pct: Percent,
    pro_labore: Money,
) -> BreakEven {
    let cm = Decimal::ONE - total_variable_pct / Decimal::ONE_HUNDRED;
    if cm <= Decimal::ZERO {
        log::warn!(
            "contribution margin {cm} is not positive (variable costs {total_variable_pct}%); break-even unreachable"
        );
        return BreakEven::Unreachable;
    }
    match total_fixed.saturating_add(pro_labore).checked_div(cm) {
        Some(revenue) => BreakEven::Reachable(revenue),
        None => {
            log::warn!("break-even beyond decimal range (contribution margin {cm}); unreachable");
            BreakEven::Unreachable
        }
    }
}
