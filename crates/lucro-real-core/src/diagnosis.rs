//! Full diagnosis of one reporting period: every calculator run over the
//! same snapshot and bundled into a single report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::alerts::detector::{detect_self_deception_with, AlertReport};
use crate::alerts::rules::months_until_broke;
use crate::analysis::growth::{calculate_growth_capacity, GrowthCapacity};
use crate::analysis::health::{health_status, HealthIndicator};
use crate::analysis::risk::{calculate_financial_risk_with, FinancialRisk};
use crate::business::UserBusiness;
use crate::config::DiagnosisConfig;
use crate::metrics::break_even::{break_even_from_totals, calculate_break_even, BreakEven};
use crate::snapshot::FinancialSnapshot;
use crate::types::*;
use crate::LucroRealResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// What to diagnose: a full business for a month, or a ready snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosisSubject {
    Business { business: UserBusiness, month: String },
    Snapshot(FinancialSnapshot),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisInput {
    pub current: DiagnosisSubject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<FinancialSnapshot>,
    #[serde(default)]
    pub config: DiagnosisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub snapshot: FinancialSnapshot,
    pub break_even: BreakEven,
    pub break_even_share: Option<Percent>,
    pub health: HealthIndicator,
    pub risk: FinancialRisk,
    pub growth: GrowthCapacity,
    pub alerts: AlertReport,
    /// Months the business survives at the current loss; only set on loss.
    pub runway_months: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Snapshot, break-even, health, risk, growth capacity and alerts in one pass.
pub fn diagnose(input: &DiagnosisInput) -> LucroRealResult<ComputationOutput<DiagnosisReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;

    let (snapshot, break_even) = match &input.current {
        DiagnosisSubject::Business { business, month } => {
            business.validate()?;
            let snapshot = FinancialSnapshot::from_business(business, month.clone());
            let break_even = calculate_break_even(
                &business.fixed_costs,
                &business.variable_costs,
                business.pro_labore,
            );
            (snapshot, break_even)
        }
        DiagnosisSubject::Snapshot(snapshot) => {
            if !snapshot.is_consistent() {
                warnings.push(format!(
                    "Snapshot {} profit/margin do not match its totals; stored values used.",
                    snapshot.month
                ));
            }
            (snapshot.clone(), snapshot_break_even(snapshot))
        }
    };

    if snapshot.revenue.is_zero() {
        warnings.push("Revenue is zero; profit margin reported as 0.".into());
    }
    if !break_even.is_reachable() {
        warnings.push(
            "Variable costs consume 100% or more of revenue; break-even is unreachable.".into(),
        );
    }
    if input.previous.is_none() {
        warnings.push("No previous snapshot; month-over-month rules skipped.".into());
    }

    let alerts = detect_self_deception_with(&snapshot, input.previous.as_ref(), &input.config);
    let runway_months = (snapshot.real_profit < Decimal::ZERO).then(|| months_until_broke(&snapshot));

    let report = DiagnosisReport {
        break_even_share: break_even.share_of(snapshot.revenue),
        health: health_status(snapshot.profit_margin),
        risk: calculate_financial_risk_with(&snapshot, &input.config),
        growth: calculate_growth_capacity(&snapshot),
        alerts: AlertReport::from_alerts(alerts),
        runway_months,
        break_even,
        snapshot,
    };

    log::debug!(
        "diagnosis for {}: health={:?} risk={} ({}) alerts={}",
        report.snapshot.month,
        report.health.status,
        report.risk.level,
        report.risk.score,
        report.alerts.alerts.len()
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "minimum_wage": input.config.minimum_wage.to_string(),
        "locale": input.config.locale.to_string(),
        "health_bands": {"healthy": "20", "warning": "10"},
        "investable_share_of_profit": "0.7",
    });

    Ok(with_metadata(
        "Lucro Real diagnosis (profit, break-even, risk, growth, alerts)",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Break-even from snapshot totals, with variable costs folded back into a
/// percentage of revenue. Variable costs without revenue never break even.
fn snapshot_break_even(snapshot: &FinancialSnapshot) -> BreakEven {
    match snapshot.variable_cost_share() {
        Some(pct) => break_even_from_totals(snapshot.total_fixed_costs, pct, snapshot.pro_labore),
        None if snapshot.total_variable_costs > Decimal::ZERO => BreakEven::Unreachable,
        None => break_even_from_totals(
            snapshot.total_fixed_costs,
            Decimal::ZERO,
            snapshot.pro_labore,
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::model::AlertRule;
    use crate::analysis::health::HealthStatus;
    use crate::analysis::risk::RiskLevel;
    use crate::business::{FixedCost, VariableCost};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn business() -> UserBusiness {
        UserBusiness {
            id: "b1".into(),
            user_id: "u1".into(),
            business_name: "Estúdio".into(),
            business_type: "servicos".into(),
            monthly_revenue: dec!(10000),
            fixed_costs: vec![FixedCost {
                id: "aluguel".into(),
                name: "Aluguel".into(),
                amount: dec!(3000),
                category: "estrutura".into(),
            }],
            variable_costs: vec![VariableCost {
                id: "taxas".into(),
                name: "Taxas".into(),
                percentage_of_revenue: dec!(10),
                category: "variavel".into(),
            }],
            pro_labore: dec!(3000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_diagnose_business() {
        let input = DiagnosisInput {
            current: DiagnosisSubject::Business {
                business: business(),
                month: "2024-06".into(),
            },
            previous: None,
            config: DiagnosisConfig::default(),
        };
        let out = diagnose(&input).unwrap();
        let report = out.result;

        // 10000 - 3000 - 1000 - 3000
        assert_eq!(report.snapshot.real_profit, dec!(3000));
        assert_eq!(report.snapshot.profit_margin, dec!(30));
        // (3000 + 3000) / 0.9
        assert_eq!(report.break_even.revenue().unwrap().round_dp(2), dec!(6666.67));
        assert_eq!(report.health.status, HealthStatus::Healthy);
        assert_eq!(report.risk.level, RiskLevel::Low);
        assert!(report.growth.can_grow);
        assert_eq!(report.runway_months, None);
        assert!(report
            .alerts
            .alerts
            .iter()
            .any(|a| a.rule == AlertRule::ExcellentMargin));
        assert!(out.warnings.iter().any(|w| w.contains("month-over-month")));
    }

    #[test]
    fn test_diagnose_snapshot_with_loss() {
        let snapshot =
            FinancialSnapshot::from_totals("2024-06", dec!(5000), dec!(3000), dec!(1000), dec!(1500));
        let input = DiagnosisInput {
            current: DiagnosisSubject::Snapshot(snapshot),
            previous: None,
            config: DiagnosisConfig::default(),
        };
        let report = diagnose(&input).unwrap().result;

        assert_eq!(report.snapshot.real_profit, dec!(-500));
        // floor(5000 * 0.1 / 500)
        assert_eq!(report.runway_months, Some(dec!(1)));
        assert_eq!(report.health.status, HealthStatus::Danger);
        assert!(!report.growth.can_grow);
        assert_eq!(report.alerts.alerts[0].rule, AlertRule::RealLoss);
    }

    #[test]
    fn test_snapshot_break_even_without_revenue() {
        let with_variable =
            FinancialSnapshot::from_totals("2024-06", Decimal::ZERO, dec!(100), dec!(50), Decimal::ZERO);
        assert_eq!(snapshot_break_even(&with_variable), BreakEven::Unreachable);

        let fixed_only =
            FinancialSnapshot::from_totals("2024-06", Decimal::ZERO, dec!(100), Decimal::ZERO, dec!(20));
        assert_eq!(snapshot_break_even(&fixed_only), BreakEven::Reachable(dec!(120)));
    }

    #[test]
    fn test_invalid_business_rejected() {
        let mut b = business();
        b.pro_labore = dec!(-1);
        let input = DiagnosisInput {
            current: DiagnosisSubject::Business {
                business: b,
                month: "2024-06".into(),
            },
            previous: None,
            config: DiagnosisConfig::default(),
        };
        assert!(diagnose(&input).is_err());
    }

    #[test]
    fn test_untagged_subject_deserializes_both_shapes() {
        let snap: DiagnosisSubject = serde_json::from_value(serde_json::json!({
            "month": "2024-06",
            "revenue": "1000",
            "total_fixed_costs": "200",
            "total_variable_costs": "100",
            "pro_labore": "300",
            "real_profit": "400",
            "profit_margin": "40"
        }))
        .unwrap();
        assert!(matches!(snap, DiagnosisSubject::Snapshot(_)));

        let biz: DiagnosisSubject = serde_json::from_value(serde_json::json!({
            "business": {
                "business_name": "Loja",
                "monthly_revenue": "1000",
                "pro_labore": "0"
            },
            "month": "2024-06"
        }))
        .unwrap();
        assert!(matches!(biz, DiagnosisSubject::Business { .. }));
    }
}
