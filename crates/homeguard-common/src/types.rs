use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alert severity level, ordered from lowest to highest.
///
/// The Indonesian level names (`rendah`, `sedang`, `tinggi`, `kritis`) are
/// accepted when parsing.
///
/// # Examples
///
/// ```
/// use homeguard_common::types::Severity;
///
/// let sev: Severity = "high".parse().unwrap();
/// assert_eq!(sev, Severity::High);
/// assert_eq!(sev.to_string(), "high");
/// assert_eq!("Kritis".parse::<Severity>().unwrap(), Severity::Critical);
/// assert!(Severity::Critical > Severity::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Translation key of the human-readable label.
    pub fn label_key(&self) -> &'static str {
        match self {
            Severity::Low => "severity.low",
            Severity::Medium => "severity.medium",
            Severity::High => "severity.high",
            Severity::Critical => "severity.critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "rendah" => Ok(Severity::Low),
            "medium" | "sedang" => Ok(Severity::Medium),
            "high" | "tinggi" => Ok(Severity::High),
            "critical" | "kritis" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Physical unit or scale a sensor value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorUnit {
    /// Normalized 0.0..=1.0 activation (PIR, magnetic contact).
    Ratio,
    Percent,
    /// Parts per million (smoke / gas).
    Ppm,
    Decibel,
}

impl std::fmt::Display for SensorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorUnit::Ratio => Ok(()),
            SensorUnit::Percent => write!(f, "%"),
            SensorUnit::Ppm => write!(f, "ppm"),
            SensorUnit::Decibel => write!(f, "dB"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorValue {
    pub value: f64,
    pub unit: SensorUnit,
}

/// All sensor values captured at one instant.
///
/// Produced fresh on every poll tick and discarded after evaluation.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use homeguard_common::types::{SensorReading, SensorUnit};
///
/// let reading = SensorReading::new(Utc::now())
///     .with("pir", 0.82, SensorUnit::Ratio)
///     .with("vibration", 12.0, SensorUnit::Percent);
/// assert_eq!(reading.value("pir"), Some(0.82));
/// assert_eq!(reading.value("smoke"), None);
/// assert_eq!(reading.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub captured_at: DateTime<Utc>,
    values: BTreeMap<String, SensorValue>,
}

impl SensorReading {
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, sensor: &str, value: f64, unit: SensorUnit) -> Self {
        self.insert(sensor, value, unit);
        self
    }

    pub fn insert(&mut self, sensor: &str, value: f64, unit: SensorUnit) {
        self.values
            .insert(sensor.to_string(), SensorValue { value, unit });
    }

    pub fn get(&self, sensor: &str) -> Option<&SensorValue> {
        self.values.get(sensor)
    }

    pub fn value(&self, sensor: &str) -> Option<f64> {
        self.values.get(sensor).map(|v| v.value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A fired threshold rule.
///
/// Carries no generated identifiers, so evaluating the same inputs at the
/// same instant always yields equal events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub timestamp: DateTime<Utc>,
    pub rule_id: String,
    /// Human-readable rule name (e.g., "Motion detected")
    pub rule_name: String,
    pub sensor: String,
    pub value: f64,
    pub limit: f64,
    pub severity: Severity,
    pub message: String,
    /// Actuator the rule asks to fire, if any.
    pub actuator: Option<String>,
}

impl AlertEvent {
    /// One-line log representation, newest-first activity list style.
    pub fn log_line(&self) -> String {
        format!(
            "[{}] {} {}",
            self.timestamp.format("%H:%M:%S"),
            self.severity,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn severity_accepts_indonesian_levels() {
        assert_eq!("rendah".parse::<Severity>().unwrap(), Severity::Low);
        assert_eq!("Sedang".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!("TINGGI".parse::<Severity>().unwrap(), Severity::High);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn sensor_reading_insert_overwrites() {
        let mut reading = SensorReading::new(Utc::now());
        reading.insert("pir", 0.1, SensorUnit::Ratio);
        reading.insert("pir", 0.9, SensorUnit::Ratio);
        assert_eq!(reading.len(), 1);
        assert_eq!(reading.value("pir"), Some(0.9));
    }

    #[test]
    fn alert_event_log_line() {
        let event = AlertEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 21, 4, 9).unwrap(),
            rule_id: "pir-motion".into(),
            rule_name: "Motion detected".into(),
            sensor: "pir".into(),
            value: 0.82,
            limit: 0.7,
            severity: Severity::High,
            message: "Motion detected: pir reading 0.82 is above 0.70".into(),
            actuator: Some("siren".into()),
        };
        assert_eq!(
            event.log_line(),
            "[21:04:09] high Motion detected: pir reading 0.82 is above 0.70"
        );
    }
}
