use chrono::{DateTime, Duration, Utc};
use homeguard_common::i18n::TRANSLATIONS;
use homeguard_common::types::{AlertEvent, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Normal,
    Alert,
    Degraded,
}

/// System status shown by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub level: StatusLevel,
    /// Severity of the alert driving an `Alert` status.
    pub severity: Option<Severity>,
    /// Localized status label (e.g., "NORMAL", "WASPADA").
    pub label: String,
    pub last_event: Option<AlertEvent>,
    pub checked_at: DateTime<Utc>,
}

/// Derives the status from the most recent alert.
///
/// A degraded sensor source wins over everything else; otherwise the status
/// is `Alert` while the latest event is younger than `window`.
pub fn summarize(
    latest: Option<AlertEvent>,
    degraded: bool,
    now: DateTime<Utc>,
    window: Duration,
    locale: &str,
) -> StatusSummary {
    let recent = latest
        .as_ref()
        .filter(|event| now - event.timestamp <= window);

    let (level, severity) = if degraded {
        (StatusLevel::Degraded, None)
    } else if let Some(event) = recent {
        (StatusLevel::Alert, Some(event.severity))
    } else {
        (StatusLevel::Normal, None)
    };

    let label = match level {
        StatusLevel::Normal => TRANSLATIONS.get(locale, "status.normal", "NORMAL"),
        StatusLevel::Alert => TRANSLATIONS.get(locale, "status.alert", "ALERT"),
        StatusLevel::Degraded => TRANSLATIONS.get(locale, "status.degraded", "DEGRADED"),
    };

    StatusSummary {
        level,
        severity,
        label: label.to_string(),
        last_event: latest,
        checked_at: now,
    }
}
