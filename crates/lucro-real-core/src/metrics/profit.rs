use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::business::{self, FixedCost, UserBusiness, VariableCost};
use crate::metrics::break_even::{calculate_break_even, BreakEven};
use crate::snapshot::FinancialSnapshot;
use crate::types::*;
use crate::LucroRealResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessMetricsInput {
    pub business: UserBusiness,
    /// Reporting period label, e.g. "2024-05".
    pub month: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub snapshot: FinancialSnapshot,
    pub break_even: BreakEven,
    /// Break-even revenue as a share of current revenue, in points.
    pub break_even_share: Option<Percent>,
    /// Revenue above break-even, in currency.
    pub safety_margin: Option<Money>,
}

// ---------------------------------------------------------------------------
// Pure calculations
// ---------------------------------------------------------------------------

/// Revenue minus fixed costs, variable costs (as % of revenue) and pró-labore.
///
/// Negative results are losses, not errors.
pub fn calculate_real_profit(
    revenue: Money,
    fixed_costs: &[FixedCost],
    variable_costs: &[VariableCost],
    pro_labore: Money,
) -> Money {
    let total_fixed = business::total_fixed(fixed_costs);
    let total_variable = business::total_variable(revenue, variable_costs);
    revenue
        .saturating_sub(total_fixed)
        .saturating_sub(total_variable)
        .saturating_sub(pro_labore)
}

/// Profit as a percentage of revenue; exactly zero when there is no revenue.
///
/// A margin beyond `Decimal`'s range saturates at `Decimal::MAX`/`MIN`.
pub fn calculate_profit_margin(profit: Money, revenue: Money) -> Percent {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    profit
        .checked_div(revenue)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            log::warn!("margin of {profit} over {revenue} out of range; saturating");
            if profit.is_sign_negative() == revenue.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reduce a business into its snapshot and break-even position.
pub fn analyze_business(
    input: &BusinessMetricsInput,
) -> LucroRealResult<ComputationOutput<BusinessMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.business.validate()?;

    let business = &input.business;
    let snapshot = FinancialSnapshot::from_business(business, input.month.clone());

    if business.monthly_revenue.is_zero() {
        warnings.push("Revenue is zero; profit margin reported as 0.".into());
    }

    let break_even = calculate_break_even(
        &business.fixed_costs,
        &business.variable_costs,
        business.pro_labore,
    );
    if !break_even.is_reachable() {
        warnings.push(
            "Variable costs consume 100% or more of revenue; break-even is unreachable.".into(),
        );
    }

    let break_even_share = break_even.share_of(snapshot.revenue);
    let safety_margin = break_even.revenue().map(|be| snapshot.revenue.saturating_sub(be));

    log::debug!(
        "analyzed '{}' for {}: profit={} margin={} break_even={:?}",
        business.business_name,
        snapshot.month,
        snapshot.real_profit,
        snapshot.profit_margin,
        break_even
    );

    let output = BusinessMetrics {
        snapshot,
        break_even,
        break_even_share,
        safety_margin,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "variable_costs": "percentage of current revenue",
        "pro_labore": "treated as a fixed monthly cost",
        "zero_revenue_margin": "0",
    });

    Ok(with_metadata(
        "Real profit, margin and break-even (contribution margin method)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn fixed(amount: Money) -> FixedCost {
        FixedCost {
            id: "f".into(),
            name: "Aluguel".into(),
            amount,
            category: "aluguel".into(),
        }
    }

    fn variable(pct: Percent) -> VariableCost {
        VariableCost {
            id: "v".into(),
            name: "Taxas".into(),
            percentage_of_revenue: pct,
            category: "taxas".into(),
        }
    }

    fn sample_input() -> BusinessMetricsInput {
        BusinessMetricsInput {
            business: UserBusiness {
                id: "b1".into(),
                user_id: "u1".into(),
                business_name: "Loja".into(),
                business_type: "ecommerce".into(),
                monthly_revenue: dec!(10000),
                fixed_costs: vec![fixed(dec!(6000))],
                variable_costs: vec![variable(dec!(10))],
                pro_labore: dec!(1000),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            month: "2024-05".into(),
        }
    }

    #[test]
    fn test_real_profit() {
        // 10000 - 6000 - 1000 - 1000
        let profit = calculate_real_profit(dec!(10000), &[fixed(dec!(6000))], &[variable(dec!(10))], dec!(1000));
        assert_eq!(profit, dec!(2000));
    }

    #[test]
    fn test_real_profit_can_be_negative() {
        let profit = calculate_real_profit(dec!(5000), &[fixed(dec!(3000))], &[variable(dec!(20))], dec!(1500));
        assert_eq!(profit, dec!(-500));
    }

    #[test]
    fn test_real_profit_without_costs_is_revenue_minus_pro_labore() {
        assert_eq!(calculate_real_profit(dec!(3000), &[], &[], dec!(1000)), dec!(2000));
    }

    #[test]
    fn test_margin() {
        assert_eq!(calculate_profit_margin(dec!(2000), dec!(10000)), dec!(20));
        assert_eq!(calculate_profit_margin(dec!(-500), dec!(5000)), dec!(-10));
    }

    #[test]
    fn test_margin_out_of_range_saturates() {
        let loss = -Decimal::from_scientific("1e27").unwrap();
        assert_eq!(calculate_profit_margin(loss, dec!(0.01)), Decimal::MIN);
        assert_eq!(calculate_profit_margin(-loss, dec!(0.01)), Decimal::MAX);
    }

    #[test]
    fn test_margin_zero_revenue_guard() {
        assert_eq!(calculate_profit_margin(dec!(-800), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(calculate_profit_margin(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_analyze_business() {
        let out = analyze_business(&sample_input()).unwrap();
        let m = &out.result;
        assert_eq!(m.snapshot.real_profit, dec!(2000));
        assert_eq!(m.snapshot.profit_margin, dec!(20));
        // (6000 + 1000) / 0.9
        let be = m.break_even.revenue().unwrap();
        assert_eq!(be, dec!(7000) / dec!(0.9));
        assert_eq!(m.safety_margin, Some(dec!(10000) - be));
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_analyze_business_unreachable_break_even_warns() {
        let mut input = sample_input();
        input.business.variable_costs = vec![variable(dec!(60)), variable(dec!(45))];
        let out = analyze_business(&input).unwrap();
        assert_eq!(out.result.break_even, BreakEven::Unreachable);
        assert_eq!(out.result.break_even_share, None);
        assert_eq!(out.result.safety_margin, None);
        assert!(out.warnings.iter().any(|w| w.contains("unreachable")));
    }

    #[test]
    fn test_analyze_business_rejects_negative_pro_labore() {
        let mut input = sample_input();
        input.business.pro_labore = dec!(-1);
        assert!(analyze_business(&input).is_err());
    }
}
