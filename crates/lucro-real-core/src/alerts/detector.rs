use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::alerts::model::{Alert, AlertType};
use crate::alerts::rules::{RuleContext, RULES};
use crate::config::DiagnosisConfig;
use crate::snapshot::FinancialSnapshot;
use crate::types::*;
use crate::LucroRealResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertInput {
    pub current: FinancialSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<FinancialSnapshot>,
    #[serde(default)]
    pub config: DiagnosisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertReport {
    pub alerts: Vec<Alert>,
    pub danger_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl AlertReport {
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let count = |t: AlertType| alerts.iter().filter(|a| a.alert_type == t).count();
        Self {
            danger_count: count(AlertType::Danger),
            warning_count: count(AlertType::Warning),
            info_count: count(AlertType::Info),
            alerts,
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Evaluate every rule against `current` (and `previous`, when given) with
/// the default configuration.
pub fn detect_self_deception(
    current: &FinancialSnapshot,
    previous: Option<&FinancialSnapshot>,
) -> Vec<Alert> {
    detect_self_deception_with(current, previous, &DiagnosisConfig::default())
}

/// Evaluate every rule and return the fired alerts, highest priority first.
///
/// Ids follow evaluation order; equal priorities keep that order.
pub fn detect_self_deception_with(
    current: &FinancialSnapshot,
    previous: Option<&FinancialSnapshot>,
    config: &DiagnosisConfig,
) -> Vec<Alert> {
    let ctx = RuleContext::new(current, previous, config);

    let mut alerts: Vec<Alert> = RULES
        .iter()
        .filter_map(|rule| {
            let finding = (rule.evaluate)(&ctx);
            if finding.is_some() {
                log::debug!("rule '{}' fired for {}", rule.name, current.month);
            }
            finding
        })
        .enumerate()
        .map(|(i, finding)| finding.into_alert(i + 1))
        .collect();

    // Vec::sort_by is stable.
    alerts.sort_by(|a, b| b.priority.cmp(&a.priority));
    alerts
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the detector and wrap the alerts with counts and metadata.
pub fn analyze_alerts(input: &AlertInput) -> LucroRealResult<ComputationOutput<AlertReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;

    if !input.current.is_consistent() {
        warnings.push(format!(
            "Snapshot {} profit/margin do not match its totals; alerts use the stored values.",
            input.current.month
        ));
    }
    match &input.previous {
        None => warnings.push("No previous snapshot; month-over-month rules skipped.".into()),
        Some(prev) if prev.revenue.is_zero() => warnings
            .push("Previous month has no revenue; growth is unbounded or undefined.".into()),
        Some(_) => {}
    }

    let alerts = detect_self_deception_with(&input.current, input.previous.as_ref(), &input.config);
    let output = AlertReport::from_alerts(alerts);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "minimum_wage": input.config.minimum_wage.to_string(),
        "locale": input.config.locale.to_string(),
        "ordering": "priority descending, ties in rule order",
    });

    Ok(with_metadata(
        "Self-deception detector (rule battery)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
