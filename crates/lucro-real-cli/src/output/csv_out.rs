use serde_json::Value;
use std::io;

use super::{find_alerts, flatten, scalar_text};

const ALERT_COLUMNS: [&str; 7] = ["id", "type", "priority", "rule", "title", "message", "insight"];

/// Write output as CSV to stdout: one row per alert when the result carries
/// alerts, otherwise dotted field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = value.get("result").unwrap_or(value);

    let written = match find_alerts(result) {
        Some(alerts) => write_alerts(&mut wtr, alerts),
        None => write_fields(&mut wtr, result),
    };
    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        log::error!("failed to write CSV: {e}");
    }
}

fn write_alerts<W: io::Write>(wtr: &mut csv::Writer<W>, alerts: &[Value]) -> csv::Result<()> {
    wtr.write_record(ALERT_COLUMNS)?;
    for alert in alerts {
        let row: Vec<String> = ALERT_COLUMNS
            .iter()
            .map(|col| alert.get(*col).map(scalar_text).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    let mut fields = Vec::new();
    flatten("", result, &mut fields);
    wtr.write_record(["field", "value"])?;
    for (key, val) in &fields {
        let text = match val {
            Value::Array(arr) => arr.iter().map(scalar_text).collect::<Vec<_>>().join("; "),
            other => scalar_text(other),
        };
        wtr.write_record([key.as_str(), text.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        f(&mut wtr).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_fields_are_flattened() {
        let out = render(|w| write_fields(w, &json!({"risk": {"score": 45, "factors": ["a", "b"]}})));
        assert_eq!(out, "field,value\nrisk.factors,a; b\nrisk.score,45\n");
    }

    #[test]
    fn test_alert_rows() {
        let alerts = vec![json!({
            "id": "alert-1", "type": "danger", "priority": 10, "rule": "real_loss",
            "title": "T", "message": "M", "insight": "I"
        })];
        let out = render(|w| write_alerts(w, &alerts));
        assert_eq!(
            out,
            "id,type,priority,rule,title,message,insight\nalert-1,danger,10,real_loss,T,M,I\n"
        );
    }
}
