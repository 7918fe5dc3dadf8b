use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::{Locale, MoneyFormatter};
use crate::types::{Currency, Money};
use crate::{LucroRealError, LucroRealResult};

/// Brazilian minimum wage (2024), the reference for pró-labore checks.
pub const DEFAULT_MINIMUM_WAGE: Money = dec!(1412);

/// Tunables shared by the alert engine, the risk scorer and the formatter.
///
/// Every field has a default so a partial JSON/YAML document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// Reference minimum wage used by the pró-labore rules.
    pub minimum_wage: Money,
    pub locale: Locale,
    pub currency: Currency,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            minimum_wage: DEFAULT_MINIMUM_WAGE,
            locale: Locale::default(),
            currency: Currency::default(),
        }
    }
}

impl DiagnosisConfig {
    pub fn validate(&self) -> LucroRealResult<()> {
        if self.minimum_wage <= Decimal::ZERO {
            return Err(LucroRealError::Config(format!(
                "minimum_wage must be positive, got {}",
                self.minimum_wage
            )));
        }
        Ok(())
    }

    pub fn formatter(&self) -> MoneyFormatter {
        MoneyFormatter::new(self.locale, self.currency.clone())
    }
}
