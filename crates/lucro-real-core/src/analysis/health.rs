use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Danger,
}

impl HealthStatus {
    /// Label shown next to the margin on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Saudável",
            HealthStatus::Warning => "Atenção",
            HealthStatus::Danger => "Crítico",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIndicator {
    pub status: HealthStatus,
    pub label: String,
}

/// Traffic-light reading of the profit margin: 20%+ healthy, 10%+ warning.
pub fn health_status(profit_margin: Percent) -> HealthIndicator {
    let status = if profit_margin >= dec!(20) {
        HealthStatus::Healthy
    } else if profit_margin >= dec!(10) {
        HealthStatus::Warning
    } else {
        HealthStatus::Danger
    };
    HealthIndicator {
        status,
        label: status.label().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(health_status(dec!(20)).status, HealthStatus::Healthy);
        assert_eq!(health_status(dec!(19.99)).status, HealthStatus::Warning);
        assert_eq!(health_status(dec!(10)).status, HealthStatus::Warning);
        assert_eq!(health_status(dec!(9.5)).status, HealthStatus::Danger);
        assert_eq!(health_status(dec!(-30)).label, "Crítico");
    }
}
