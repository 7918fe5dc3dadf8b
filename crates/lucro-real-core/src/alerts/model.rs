use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Danger,
    Warning,
    Info,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// Every rule the detector knows, in evaluation order.
///
/// Type, priority and title are fixed per rule; only the message and
/// insight depend on the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertRule {
    RealLoss,
    CriticalMargin,
    ProLaboreBelowMinimumWage,
    GrowthWithoutProfit,
    RevenueFreefall,
    MarginErosion,
    FixedCostsSuffocating,
    FixedCostsHigh,
    ThinSafetyMargin,
    NoProLabore,
    LowProLabore,
    TightMargin,
    VariableCostsHigh,
    ProfitBelowProLabore,
    StagnantRevenue,
    HealthyMargin,
    ExcellentMargin,
    InvestmentCapacity,
}

impl AlertRule {
    pub fn alert_type(self) -> AlertType {
        use AlertRule::*;
        match self {
            RealLoss
            | CriticalMargin
            | ProLaboreBelowMinimumWage
            | GrowthWithoutProfit
            | RevenueFreefall
            | FixedCostsSuffocating => AlertType::Danger,
            MarginErosion
            | FixedCostsHigh
            | ThinSafetyMargin
            | NoProLabore
            | LowProLabore
            | TightMargin
            | VariableCostsHigh
            | ProfitBelowProLabore => AlertType::Warning,
            StagnantRevenue | HealthyMargin | ExcellentMargin | InvestmentCapacity => {
                AlertType::Info
            }
        }
    }

    pub fn priority(self) -> u8 {
        use AlertRule::*;
        match self {
            RealLoss | CriticalMargin | ProLaboreBelowMinimumWage => 10,
            GrowthWithoutProfit | RevenueFreefall | FixedCostsSuffocating => 9,
            MarginErosion | FixedCostsHigh | ThinSafetyMargin => 8,
            NoProLabore | LowProLabore | TightMargin | VariableCostsHigh | ProfitBelowProLabore => 7,
            StagnantRevenue => 6,
            HealthyMargin | InvestmentCapacity => 5,
            ExcellentMargin => 4,
        }
    }

    pub fn title(self) -> &'static str {
        use AlertRule::*;
        match self {
            RealLoss => "Você não tem um negócio. Você tem um hobby caro.",
            CriticalMargin => "Você está trabalhando quase de graça",
            ProLaboreBelowMinimumWage => "Seu negócio te paga menos que um salário mínimo",
            GrowthWithoutProfit => "Você cresceu, mas empobreceu",
            RevenueFreefall => "Faturamento em queda livre",
            MarginErosion => "Sua margem está derretendo",
            FixedCostsSuffocating => "Seus custos fixos estão te matando",
            FixedCostsHigh => "Custos fixos muito altos",
            ThinSafetyMargin => "Você está na corda bamba",
            NoProLabore => "Você está trabalhando de graça",
            LowProLabore => "Seu pró-labore é muito baixo",
            TightMargin => "Margem apertada",
            VariableCostsHigh => "Custos variáveis comendo sua margem",
            ProfitBelowProLabore => "Você é CLT do seu próprio negócio",
            StagnantRevenue => "Seu negócio está parado",
            HealthyMargin => "Seu negócio está saudável",
            ExcellentMargin => "Parabéns! Seu negócio é lucrativo",
            InvestmentCapacity => "Você tem capacidade de investir",
        }
    }
}

/// A plain-language finding about the business, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    pub insight: String,
    pub priority: u8,
    pub rule: AlertRule,
}
