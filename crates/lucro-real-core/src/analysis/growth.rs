use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::to_fixed;
use crate::snapshot::FinancialSnapshot;
use crate::types::Percent;

/// Share of profit that may be reinvested; the rest stays as reserve.
const INVESTABLE_SHARE: Decimal = dec!(0.7);

/// Below this margin growth is discouraged even when profitable.
const MIN_GROWTH_MARGIN: Percent = dec!(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCapacity {
    pub can_grow: bool,
    /// Safe revenue growth funded by current profit, in points.
    pub max_safe_growth: Percent,
    pub recommendation: String,
}

/// Whether the business can fund expansion from its own profit.
///
/// Guards run in order: no profit, then thin margin; only then is 70% of
/// profit expressed as a share of revenue.
pub fn calculate_growth_capacity(snapshot: &FinancialSnapshot) -> GrowthCapacity {
    if snapshot.real_profit <= Decimal::ZERO {
        return GrowthCapacity {
            can_grow: false,
            max_safe_growth: Decimal::ZERO,
            recommendation: "Foque em lucrar antes de crescer. Crescimento sem lucro é suicídio."
                .into(),
        };
    }

    // A hand-built snapshot may carry a margin without revenue; treat it as thin.
    if snapshot.profit_margin < MIN_GROWTH_MARGIN || snapshot.revenue <= Decimal::ZERO {
        return GrowthCapacity {
            can_grow: false,
            max_safe_growth: Decimal::ZERO,
            recommendation:
                "Margem muito baixa. Aumente preços ou corte custos antes de crescer.".into(),
        };
    }

    let investment_capacity = snapshot.real_profit * INVESTABLE_SHARE;
    let max_safe_growth = investment_capacity
        .checked_div(snapshot.revenue)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX);

    GrowthCapacity {
        can_grow: true,
        max_safe_growth,
        recommendation: format!(
            "Você pode crescer até {}% com segurança usando seu lucro atual.",
            to_fixed(max_safe_growth, 0)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(revenue: Decimal, profit: Decimal, margin: Decimal) -> FinancialSnapshot {
        FinancialSnapshot {
            month: "2024-05".into(),
            revenue,
            total_fixed_costs: Decimal::ZERO,
            total_variable_costs: Decimal::ZERO,
            pro_labore: revenue - profit,
            real_profit: profit,
            profit_margin: margin,
        }
    }

    #[test]
    fn test_can_grow_21_percent() {
        let g = calculate_growth_capacity(&snapshot(dec!(10000), dec!(3000), dec!(30)));
        assert!(g.can_grow);
        assert_eq!(g.max_safe_growth, dec!(21));
        assert!(g.recommendation.contains("21%"));
    }

    #[test]
    fn test_no_profit_cannot_grow() {
        let g = calculate_growth_capacity(&snapshot(dec!(10000), Decimal::ZERO, Decimal::ZERO));
        assert!(!g.can_grow);
        assert_eq!(g.max_safe_growth, Decimal::ZERO);
        assert!(g.recommendation.starts_with("Foque em lucrar"));
    }

    #[test]
    fn test_thin_margin_blocks_growth_despite_profit() {
        let g = calculate_growth_capacity(&snapshot(dec!(10000), dec!(900), dec!(9)));
        assert!(!g.can_grow);
        assert_eq!(g.max_safe_growth, Decimal::ZERO);
        assert!(g.recommendation.starts_with("Margem muito baixa"));
    }

    #[test]
    fn test_recommendation_rounds_percentage() {
        // 1234 * 0.7 / 8000 * 100 = 10.7975
        let g = calculate_growth_capacity(&snapshot(dec!(8000), dec!(1234), dec!(15.425)));
        assert!(g.can_grow);
        assert!(g.recommendation.contains("até 11%"));
    }
}
