use serde::Serialize;

use crate::constants::HIGH_UV_THRESHOLD;
use crate::metrics::FrostRisk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub icon: &'static str,
    pub message: String,
}

/// Build the dashboard alerts. A frost alert always precedes a UV alert.
pub fn compose_alerts(frost_risk: FrostRisk, uv_index: f64) -> Vec<Alert> {
    let mut alerts = Vec::new();
    push_alert(&mut alerts, frost_alert(frost_risk));
    push_alert(&mut alerts, uv_alert(uv_index));
    alerts
}

fn push_alert(alerts: &mut Vec<Alert>, alert: Option<Alert>) {
    if let Some(alert) = alert {
        alerts.push(alert);
    }
}

fn frost_alert(frost_risk: FrostRisk) -> Option<Alert> {
    (frost_risk == FrostRisk::HighRisk).then(|| Alert {
        severity: AlertSeverity::Danger,
        icon: "exclamation-triangle",
        message: "Frost Warning: Protect sensitive crops tonight!".to_string(),
    })
}

fn uv_alert(uv_index: f64) -> Option<Alert> {
    if uv_index <= HIGH_UV_THRESHOLD {
        return None;
    }
    Some(Alert {
        severity: AlertSeverity::Warning,
        icon: "sun",
        message: format!("High UV Index ({uv_index}): Limit field work during midday"),
    })
}
