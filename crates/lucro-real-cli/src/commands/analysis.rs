use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lucro_real_core::analysis::growth::calculate_growth_capacity;
use lucro_real_core::analysis::risk::calculate_financial_risk_with;
use lucro_real_core::config::DiagnosisConfig;
use lucro_real_core::snapshot::FinancialSnapshot;

use crate::input;

/// A month given either as a snapshot file or as four totals.
#[derive(Args)]
pub struct SnapshotArgs {
    /// Path to a JSON/YAML snapshot (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Reporting period label
    #[arg(long, default_value = "atual")]
    pub month: String,

    /// Monthly revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Total fixed costs
    #[arg(long, default_value = "0")]
    pub fixed: Decimal,

    /// Total variable costs, in currency
    #[arg(long, default_value = "0")]
    pub variable: Decimal,

    /// Monthly pró-labore
    #[arg(long, default_value = "0")]
    pub pro_labore: Decimal,
}

impl SnapshotArgs {
    fn into_snapshot(self, what: &str) -> Result<FinancialSnapshot, Box<dyn std::error::Error>> {
        if let Some(snapshot) = input::load(self.input.as_deref(), what)? {
            return Ok(snapshot);
        }
        let revenue = self
            .revenue
            .ok_or("--revenue is required (or provide --input)")?;
        Ok(FinancialSnapshot::try_new(
            self.month,
            revenue,
            self.fixed,
            self.variable,
            self.pro_labore,
        )?)
    }
}

pub fn run_risk(
    args: SnapshotArgs,
    config: Option<&DiagnosisConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.into_snapshot("risk")?;
    let default_config = DiagnosisConfig::default();
    let config = config.unwrap_or(&default_config);
    config.validate()?;
    let result = calculate_financial_risk_with(&snapshot, config);
    Ok(serde_json::to_value(result)?)
}

pub fn run_growth(args: SnapshotArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.into_snapshot("growth")?;
    let result = calculate_growth_capacity(&snapshot);
    Ok(serde_json::to_value(result)?)
}
