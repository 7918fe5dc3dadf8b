use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lucro_real_core::business::{FixedCost, VariableCost};
use lucro_real_core::metrics::profit::{self, BusinessMetricsInput};
use lucro_real_core::metrics::simulation::{self, PriceSimulationInput};

use crate::input;

/// Arguments for profit, margin and break-even of a business
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to JSON/YAML input with `business` and `month`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let metrics_input: BusinessMetricsInput = input::require(args.input.as_deref(), "metrics")?;
    let result = profit::analyze_business(&metrics_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the price-increase simulation
#[derive(Args)]
pub struct SimulatePriceArgs {
    /// Path to JSON/YAML input (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Current monthly revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Price change in percent (10 = +10%)
    #[arg(long, allow_hyphen_values = true)]
    pub increase: Option<Decimal>,

    /// Total monthly fixed costs
    #[arg(long, default_value = "0")]
    pub fixed: Decimal,

    /// Variable costs as percent of revenue
    #[arg(long, default_value = "0")]
    pub variable_pct: Decimal,

    /// Monthly pró-labore
    #[arg(long, default_value = "0")]
    pub pro_labore: Decimal,
}

pub fn run_simulate_price(args: SimulatePriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: PriceSimulationInput =
        match input::load(args.input.as_deref(), "simulate-price")? {
            Some(parsed) => parsed,
            None => {
                let revenue = args
                    .revenue
                    .ok_or("--revenue is required (or provide --input)")?;
                let increase = args
                    .increase
                    .ok_or("--increase is required (or provide --input)")?;
                PriceSimulationInput {
                    current_revenue: revenue,
                    increase_pct: increase,
                    fixed_costs: lump_fixed(args.fixed),
                    variable_costs: lump_variable(args.variable_pct),
                    pro_labore: args.pro_labore,
                }
            }
        };

    let result = simulation::run_price_simulation(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

fn lump_fixed(amount: Decimal) -> Vec<FixedCost> {
    if amount.is_zero() {
        return Vec::new();
    }
    vec![FixedCost {
        id: "fixed".into(),
        name: "Custos fixos".into(),
        amount,
        category: "fixo".into(),
    }]
}

fn lump_variable(pct: Decimal) -> Vec<VariableCost> {
    if pct.is_zero() {
        return Vec::new();
    }
    vec![VariableCost {
        id: "variable".into(),
        name: "Custos variáveis".into(),
        percentage_of_revenue: pct,
        category: "variavel".into(),
    }]
}
