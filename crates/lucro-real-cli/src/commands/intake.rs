use clap::Args;
use serde_json::{json, Value};

use lucro_real_core::intake::onboarding::OnboardingForm;
use lucro_real_core::levels::{business_level, LevelInput};
use lucro_real_core::snapshot::FinancialSnapshot;

use crate::input;

/// Arguments for converting a raw onboarding form
#[derive(Args)]
pub struct IntakeArgs {
    /// Path to the onboarding form as saved by the app (JSON/YAML)
    #[arg(long)]
    pub input: Option<String>,

    /// Owner of the business
    #[arg(long, default_value = "local")]
    pub user_id: String,

    /// Reporting period label for the derived snapshot
    #[arg(long, default_value = "atual")]
    pub month: String,
}

pub fn run_intake(args: IntakeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form: OnboardingForm = input::require(args.input.as_deref(), "intake")?;
    let business = form.into_business(&args.user_id)?;
    let snapshot = FinancialSnapshot::from_business(&business, args.month);
    Ok(json!({ "business": business, "snapshot": snapshot }))
}

/// Arguments for the business level lookup
#[derive(Args)]
pub struct LevelArgs {
    /// Path to JSON input with `points`
    #[arg(long)]
    pub input: Option<String>,

    /// Accumulated points
    #[arg(long)]
    pub points: Option<u32>,
}

pub fn run_level(args: LevelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let points = match args.points {
        Some(points) => points,
        None => {
            let level_input: LevelInput = input::require(args.input.as_deref(), "level")?;
            level_input.points
        }
    };
    Ok(serde_json::to_value(business_level(points))?)
}
