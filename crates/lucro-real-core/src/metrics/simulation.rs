use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::business::{FixedCost, VariableCost};
use crate::metrics::profit::{calculate_profit_margin, calculate_real_profit};
use crate::types::*;
use crate::{LucroRealError, LucroRealResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSimulationInput {
    pub current_revenue: Money,
    /// Price increase in points (10 = +10%). Negative values model a discount.
    pub increase_pct: Percent,
    #[serde(default)]
    pub fixed_costs: Vec<FixedCost>,
    #[serde(default)]
    pub variable_costs: Vec<VariableCost>,
    pub pro_labore: Money,
}

/// Outcome of raising prices with the cost structure held constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceIncreaseResult {
    pub new_revenue: Money,
    pub new_profit: Money,
    pub profit_increase: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSimulationOutput {
    pub current_profit: Money,
    pub current_margin: Percent,
    #[serde(flatten)]
    pub simulated: PriceIncreaseResult,
    pub new_margin: Percent,
}

// ---------------------------------------------------------------------------
// Pure calculation
// ---------------------------------------------------------------------------

/// Scale revenue by `(1 + increase_pct / 100)` and recompute profit.
///
/// Fixed costs and pró-labore stay put; percentage-of-revenue costs scale
/// with the new revenue.
pub fn simulate_price_increase(
    current_revenue: Money,
    increase_pct: Percent,
    fixed_costs: &[FixedCost],
    variable_costs: &[VariableCost],
    pro_labore: Money,
) -> PriceIncreaseResult {
    let new_revenue =
        current_revenue.saturating_mul(Decimal::ONE + increase_pct / Decimal::ONE_HUNDRED);
    let new_profit = calculate_real_profit(new_revenue, fixed_costs, variable_costs, pro_labore);
    let current_profit =
        calculate_real_profit(current_revenue, fixed_costs, variable_costs, pro_labore);

    PriceIncreaseResult {
        new_revenue,
        new_profit,
        profit_increase: new_profit.saturating_sub(current_profit),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// What-if: how much profit a price change adds at the current volume.
pub fn run_price_simulation(
    input: &PriceSimulationInput,
) -> LucroRealResult<ComputationOutput<PriceSimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.current_revenue < Decimal::ZERO {
        return Err(LucroRealError::InvalidInput {
            field: "current_revenue".into(),
            reason: "Revenue cannot be negative.".into(),
        });
    }
    if input.increase_pct <= -Decimal::ONE_HUNDRED {
        return Err(LucroRealError::InvalidInput {
            field: "increase_pct".into(),
            reason: "A price change of -100% or less leaves no revenue.".into(),
        });
    }
    if input.increase_pct < Decimal::ZERO {
        warnings.push("Negative increase simulates a price cut.".into());
    }

    let current_profit = calculate_real_profit(
        input.current_revenue,
        &input.fixed_costs,
        &input.variable_costs,
        input.pro_labore,
    );
    let simulated = simulate_price_increase(
        input.current_revenue,
        input.increase_pct,
        &input.fixed_costs,
        &input.variable_costs,
        input.pro_labore,
    );

    let output = PriceSimulationOutput {
        current_profit,
        current_margin: calculate_profit_margin(current_profit, input.current_revenue),
        new_margin: calculate_profit_margin(simulated.new_profit, simulated.new_revenue),
        simulated,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "volume": "unchanged",
        "fixed_costs": "unchanged",
        "variable_costs": "scale with revenue",
    });

    Ok(with_metadata(
        "Price increase simulation at constant volume",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
