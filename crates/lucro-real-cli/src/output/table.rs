use colored::Colorize;
use lucro_real_core::config::DiagnosisConfig;
use lucro_real_core::format::MoneyFormatter;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::{find_alerts, flatten, scalar_text};

const MONEY_FIELDS: &[&str] = &[
    "revenue",
    "total_fixed_costs",
    "total_variable_costs",
    "pro_labore",
    "real_profit",
    "reachable",
    "safety_margin",
    "current_profit",
    "new_revenue",
    "new_profit",
    "profit_increase",
    "monthly_revenue",
];

const PERCENT_FIELDS: &[&str] = &[
    "profit_margin",
    "break_even_share",
    "current_margin",
    "new_margin",
    "max_safe_growth",
];

/// Render the result as a field/value table, alerts as their own table.
pub fn print_table(value: &Value, config: &DiagnosisConfig) {
    let fmt = config.formatter();
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };
    let result = envelope.get("result").unwrap_or(value);

    let mut fields = Vec::new();
    flatten("", result, &mut fields);
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields.iter().filter(|(k, _)| !is_alert_list(k)) {
        builder.push_record([key.as_str(), &cell(key, val, &fmt)]);
    }
    println!("{}", Table::from(builder));

    if let Some(alerts) = find_alerts(result).filter(|a| !a.is_empty()) {
        println!();
        print_alerts(alerts);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn is_alert_list(key: &str) -> bool {
    key == "alerts" || key == "alerts.alerts"
}

fn print_alerts(alerts: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["#", "Type", "Title", "Message", "Insight"]);
    for alert in alerts {
        let field = |name: &str| alert.get(name).map(scalar_text).unwrap_or_default();
        let kind = field("type");
        let kind = match kind.as_str() {
            "danger" => kind.red().bold().to_string(),
            "warning" => kind.yellow().to_string(),
            _ => kind.green().to_string(),
        };
        builder.push_record([
            field("priority"),
            kind,
            field("title"),
            field("message"),
            field("insight"),
        ]);
    }
    println!("{}", Table::from(builder));
}

/// Money and percentage leaves go through the locale formatter.
fn cell(key: &str, value: &Value, fmt: &MoneyFormatter) -> String {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    let as_decimal = || value.as_str().and_then(|s| Decimal::from_str(s).ok());

    if MONEY_FIELDS.contains(&leaf) {
        if let Some(d) = as_decimal() {
            return fmt.currency(d);
        }
    }
    if PERCENT_FIELDS.contains(&leaf) {
        if let Some(d) = as_decimal() {
            return fmt.percent(d, 1);
        }
    }
    match value {
        Value::Array(arr) => arr.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        Value::Null => "-".to_string(),
        other => scalar_text(other),
    }
}
