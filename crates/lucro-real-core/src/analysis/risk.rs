//! Additive financial risk score.
//!
//! Four independent factors (margin, profit, fixed-cost weight, pró-labore)
//! each contribute at most once; the total maps onto a qualitative level.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::DiagnosisConfig;
use crate::snapshot::FinancialSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => RiskLevel::Critical,
            s if s >= 50 => RiskLevel::High,
            s if s >= 25 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRisk {
    pub level: RiskLevel,
    pub score: u32,
    pub factors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn add_factor(factors: &mut Vec<String>, label: &str, points: u32) -> u32 {
    factors.push(label.into());
    points
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Score a snapshot with the default minimum-wage reference.
pub fn calculate_financial_risk(snapshot: &FinancialSnapshot) -> FinancialRisk {
    calculate_financial_risk_with(snapshot, &DiagnosisConfig::default())
}

pub fn calculate_financial_risk_with(
    snapshot: &FinancialSnapshot,
    config: &DiagnosisConfig,
) -> FinancialRisk {
    let mut factors: Vec<String> = Vec::new();
    let mut score = 0u32;

    // --- Margin ---
    if snapshot.profit_margin < dec!(5) {
        score += add_factor(&mut factors, "Margem crítica", 40);
    } else if snapshot.profit_margin < dec!(15) {
        score += add_factor(&mut factors, "Margem baixa", 20);
    }

    // --- Profit ---
    if snapshot.real_profit < Decimal::ZERO {
        score += add_factor(&mut factors, "Prejuízo", 50);
    } else if snapshot.real_profit < snapshot.pro_labore * dec!(0.3) {
        score += add_factor(&mut factors, "Lucro muito baixo", 25);
    }

    // --- Fixed costs ---
    // Without revenue any positive fixed cost is an unbounded share.
    let fixed_exceeds = |threshold: Decimal| match snapshot.fixed_cost_share() {
        Some(share) => share > threshold,
        None => snapshot.total_fixed_costs > Decimal::ZERO,
    };
    if fixed_exceeds(dec!(50)) {
        score += add_factor(&mut factors, "Custos fixos altos", 30);
    } else if fixed_exceeds(dec!(40)) {
        score += add_factor(&mut factors, "Custos fixos elevados", 15);
    }

    // --- Pró-labore ---
    if snapshot.pro_labore.is_zero() {
        score += add_factor(&mut factors, "Sem pró-labore", 20);
    } else if snapshot.pro_labore < config.minimum_wage {
        score += add_factor(&mut factors, "Pró-labore muito baixo", 10);
    }

    let level = RiskLevel::from_score(score);
    log::debug!("risk score {score} ({level}) for {}: {factors:?}", snapshot.month);

    FinancialRisk {
        level,
        score,
        factors,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(
        revenue: Decimal,
        fixed: Decimal,
        variable: Decimal,
        pro_labore: Decimal,
    ) -> FinancialSnapshot {
        FinancialSnapshot::from_totals("2024-05", revenue, fixed, variable, pro_labore)
    }

    #[test]
    fn test_healthy_business_is_low_risk() {
        // profit 4000, margin 40%, fixed 30%
        let s = snapshot(dec!(10000), dec!(3000), dec!(1000), dec!(2000));
        let risk = calculate_financial_risk(&s);
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.factors.is_empty());
    }

    #[test]
    fn test_all_factors_maxed_is_critical() {
        let s = FinancialSnapshot {
            month: "2024-05".into(),
            revenue: dec!(10000),
            total_fixed_costs: dec!(5500),
            total_variable_costs: dec!(4600),
            pro_labore: Decimal::ZERO,
            real_profit: dec!(-100),
            profit_margin: dec!(3),
        };
        let risk = calculate_financial_risk(&s);
        assert_eq!(risk.score, 140);
        assert_eq!(risk.level, RiskLevel::Critical);
        assert_eq!(
            risk.factors,
            vec!["Margem crítica", "Prejuízo", "Custos fixos altos", "Sem pró-labore"]
        );
    }

    #[test]
    fn test_mid_band_factors() {
        // revenue 10000, fixed 4500 (45%), variable 3000, pró-labore 1300
        // profit 1200 -> margin 12%; 1200 >= 1300 * 0.3 so no profit factor
        let s = snapshot(dec!(10000), dec!(4500), dec!(3000), dec!(1300));
        let risk = calculate_financial_risk(&s);
        assert_eq!(risk.score, 20 + 15 + 10);
        assert_eq!(risk.level, RiskLevel::Medium);
        assert_eq!(
            risk.factors,
            vec!["Margem baixa", "Custos fixos elevados", "Pró-labore muito baixo"]
        );
    }

    #[test]
    fn test_low_profit_relative_to_pro_labore() {
        // profit 500 < 3000 * 0.3 = 900
        let s = snapshot(dec!(10000), dec!(3000), dec!(3500), dec!(3000));
        let risk = calculate_financial_risk(&s);
        assert!(risk.factors.contains(&"Lucro muito baixo".to_string()));
    }

    #[test]
    fn test_configured_minimum_wage() {
        let s = snapshot(dec!(10000), dec!(1000), dec!(1000), dec!(1450));
        let default_risk = calculate_financial_risk(&s);
        assert!(!default_risk.factors.contains(&"Pró-labore muito baixo".to_string()));

        let config = DiagnosisConfig {
            minimum_wage: dec!(1518),
            ..Default::default()
        };
        let risk = calculate_financial_risk_with(&s, &config);
        assert!(risk.factors.contains(&"Pró-labore muito baixo".to_string()));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(24), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Critical);
    }

    #[test]
    fn test_same_snapshot_same_score() {
        let s = snapshot(dec!(7000), dec!(3200), dec!(1400), dec!(900));
        assert_eq!(calculate_financial_risk(&s), calculate_financial_risk(&s));
    }
}
