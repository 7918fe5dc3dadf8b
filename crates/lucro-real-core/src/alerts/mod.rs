//! Self-deception detector: a fixed battery of rules over a snapshot (and
//! optionally the previous month's) that emits prioritized alerts.

pub mod detector;
pub mod model;
pub mod rules;

pub use detector::{analyze_alerts, detect_self_deception, detect_self_deception_with};
pub use model::{Alert, AlertRule, AlertType};
