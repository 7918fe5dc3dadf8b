use clap::Args;
use serde_json::Value;

use lucro_real_core::config::DiagnosisConfig;
use lucro_real_core::diagnosis::{self, DiagnosisInput};

use crate::input;

/// Arguments for the full diagnosis
#[derive(Args)]
pub struct DiagnoseArgs {
    /// Path to JSON/YAML input: `current` (business+month or snapshot),
    /// optional `previous` snapshot and `config`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_diagnose(
    args: DiagnoseArgs,
    config: Option<&DiagnosisConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut diagnosis_input: DiagnosisInput = input::require(args.input.as_deref(), "diagnose")?;
    if let Some(config) = config {
        diagnosis_input.config = config.clone();
    }
    let result = diagnosis::diagnose(&diagnosis_input)?;
    Ok(serde_json::to_value(result)?)
}
