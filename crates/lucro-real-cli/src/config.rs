use lucro_real_core::config::DiagnosisConfig;
use lucro_real_core::format::Locale;

use crate::input;

/// Load `--config` from JSON or YAML. Omitted fields keep their defaults.
pub fn load(path: &str) -> Result<DiagnosisConfig, Box<dyn std::error::Error>> {
    let config: DiagnosisConfig = input::file::read_structured(path)?;
    config.validate()?;
    log::info!(
        "config: minimum wage {}, locale {}, currency {:?}",
        config.minimum_wage,
        config.locale,
        config.currency
    );
    Ok(config)
}

/// Settings for a run: `--config` if given, then `--locale` on top.
/// `None` when neither flag is set, so commands fall back to their defaults.
pub fn resolve(
    path: Option<&str>,
    locale: Option<Locale>,
) -> Result<Option<DiagnosisConfig>, Box<dyn std::error::Error>> {
    let mut config = path.map(load).transpose()?;
    if let Some(locale) = locale {
        log::debug!("locale override: {locale}");
        config.get_or_insert_with(DiagnosisConfig::default).locale = locale;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_no_flags_keeps_defaults_to_commands() {
        assert!(resolve(None, None).unwrap().is_none());
    }

    #[test]
    fn test_locale_flag_alone_builds_default_config() {
        let locale = Locale::from_str("en_US").unwrap();
        let config = resolve(None, Some(locale)).unwrap().unwrap();
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.minimum_wage, DiagnosisConfig::default().minimum_wage);
        assert_eq!(config.formatter().currency(Decimal::new(12345, 1)), "R$1,234.50");
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        assert!(Locale::from_str("fr-FR").is_err());
    }
}
