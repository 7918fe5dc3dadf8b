use clap::Args;
use serde_json::Value;

use lucro_real_core::alerts::detector::{AlertInput, AlertReport};
use lucro_real_core::alerts::analyze_alerts;
use lucro_real_core::config::DiagnosisConfig;

use crate::input;

/// Arguments for the self-deception detector
#[derive(Args)]
pub struct AlertsArgs {
    /// Path to JSON/YAML input with `current` and optional `previous` snapshots
    #[arg(long)]
    pub input: Option<String>,

    /// Only show alerts at or above this priority (1-10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub min_priority: Option<u8>,
}

pub fn run_alerts(
    args: AlertsArgs,
    config: Option<&DiagnosisConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut alert_input: AlertInput = input::require(args.input.as_deref(), "alerts")?;
    if let Some(config) = config {
        alert_input.config = config.clone();
    }

    let mut result = analyze_alerts(&alert_input)?;
    if let Some(min) = args.min_priority {
        let kept = std::mem::take(&mut result.result.alerts)
            .into_iter()
            .filter(|a| a.priority >= min)
            .collect();
        result.result = AlertReport::from_alerts(kept);
    }
    Ok(serde_json::to_value(result)?)
}
