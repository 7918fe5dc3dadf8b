use serde_json::Value;

use super::scalar_text;

/// Headline value per command, tried in order.
const HEADLINE_PATHS: &[&str] = &[
    "health.label",
    "snapshot.real_profit",
    "new_profit",
    "danger_count",
    "title",
    "max_safe_growth",
];

/// Print just the headline answer from the output.
///
/// Risk prints as `<level> (<score>)`; otherwise the first headline path
/// present wins, falling back to the first field of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value.get("result").unwrap_or(value);

    if let (Some(level), Some(score)) = (result.get("level"), result.get("score")) {
        return format!("{} ({})", scalar_text(level), scalar_text(score));
    }

    for path in HEADLINE_PATHS {
        if let Some(val) = lookup(result, path).filter(|v| !v.is_null()) {
            return scalar_text(val);
        }
    }

    match result {
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(key, val)| format!("{}: {}", key, scalar_text(val)))
            .unwrap_or_default(),
        other => scalar_text(other),
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diagnosis_headline_is_health() {
        let v = json!({"result": {"health": {"status": "healthy", "label": "Saudável"}, "snapshot": {"real_profit": "2000"}}});
        assert_eq!(headline(&v), "Saudável");
    }

    #[test]
    fn test_risk_headline() {
        assert_eq!(headline(&json!({"level": "critical", "score": 140, "factors": []})), "critical (140)");
    }

    #[test]
    fn test_fallback_to_first_field() {
        assert_eq!(headline(&json!({"business": "x"})), "business: x");
    }

    #[test]
    fn test_level_headline_is_title() {
        let v = json!({"level": 2, "title": "Empresário Curioso", "points": 150, "next_level_points": 300});
        assert_eq!(headline(&v), "Empresário Curioso");
    }
}
