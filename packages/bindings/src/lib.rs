use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use lucro_real_core::config::DiagnosisConfig;
use lucro_real_core::snapshot::FinancialSnapshot;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Snapshot plus optional settings, as sent by the front end for the
/// single-month calculators.
#[derive(Deserialize)]
struct SnapshotRequest {
    snapshot: FinancialSnapshot,
    #[serde(default)]
    config: DiagnosisConfig,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_business(input_json: String) -> NapiResult<String> {
    let input: lucro_real_core::metrics::profit::BusinessMetricsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lucro_real_core::metrics::profit::analyze_business(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_price_increase(input_json: String) -> NapiResult<String> {
    let input: lucro_real_core::metrics::simulation::PriceSimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lucro_real_core::metrics::simulation::run_price_simulation(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Diagnosis
// ---------------------------------------------------------------------------

#[napi]
pub fn diagnose(input_json: String) -> NapiResult<String> {
    let input: lucro_real_core::diagnosis::DiagnosisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lucro_real_core::diagnosis::diagnose(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn detect_self_deception(input_json: String) -> NapiResult<String> {
    let input: lucro_real_core::alerts::detector::AlertInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lucro_real_core::alerts::analyze_alerts(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_financial_risk(input_json: String) -> NapiResult<String> {
    let request: SnapshotRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    request.config.validate().map_err(to_napi_error)?;
    let output = lucro_real_core::analysis::risk::calculate_financial_risk_with(
        &request.snapshot,
        &request.config,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_growth_capacity(input_json: String) -> NapiResult<String> {
    let request: SnapshotRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lucro_real_core::analysis::growth::calculate_growth_capacity(&request.snapshot);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Onboarding & presentation
// ---------------------------------------------------------------------------

#[napi]
pub fn onboarding_to_business(form_json: String, user_id: String) -> NapiResult<String> {
    let form: lucro_real_core::intake::onboarding::OnboardingForm =
        serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let business = form.into_business(&user_id).map_err(to_napi_error)?;
    serde_json::to_string(&business).map_err(to_napi_error)
}

#[napi]
pub fn business_level(points: u32) -> NapiResult<String> {
    let level = lucro_real_core::levels::business_level(points);
    serde_json::to_string(&level).map_err(to_napi_error)
}

/// Format a decimal string as currency using the given settings JSON
/// (`{"locale": "pt-BR", "currency": "BRL"}`; empty string for defaults).
#[napi]
pub fn format_currency(value: String, config_json: String) -> NapiResult<String> {
    let amount = Decimal::from_str(value.trim()).map_err(to_napi_error)?;
    let config: DiagnosisConfig = if config_json.trim().is_empty() {
        DiagnosisConfig::default()
    } else {
        serde_json::from_str(&config_json).map_err(to_napi_error)?
    };
    Ok(config.formatter().currency(amount))
}
