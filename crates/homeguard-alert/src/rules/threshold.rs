use crate::error::{AlertError, Result};
use chrono::{DateTime, Utc};
use homeguard_common::i18n::TRANSLATIONS;
use homeguard_common::types::{AlertEvent, SensorReading, Severity};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<=")]
    LessEqual,
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            ">" | "greater_than" | "gt" => Ok(Self::GreaterThan),
            "<" | "less_than" | "lt" => Ok(Self::LessThan),
            ">=" | "greater_equal" | "gte" => Ok(Self::GreaterEqual),
            "<=" | "less_equal" | "lte" => Ok(Self::LessEqual),
            _ => Err(format!("unknown compare operator: {s}")),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::LessThan => write!(f, "<"),
            Self::GreaterEqual => write!(f, ">="),
            Self::LessEqual => write!(f, "<="),
        }
    }
}

impl CompareOp {
    pub fn check(&self, value: f64, limit: f64) -> bool {
        match self {
            Self::GreaterThan => value > limit,
            Self::LessThan => value < limit,
            Self::GreaterEqual => value >= limit,
            Self::LessEqual => value <= limit,
        }
    }

    fn label_key(&self) -> &'static str {
        match self {
            Self::GreaterThan => "op.above",
            Self::LessThan => "op.below",
            Self::GreaterEqual => "op.at_or_above",
            Self::LessEqual => "op.at_or_below",
        }
    }

    fn default_label(&self) -> &'static str {
        match self {
            Self::GreaterThan => "above",
            Self::LessThan => "below",
            Self::GreaterEqual => "at or above",
            Self::LessEqual => "at or below",
        }
    }
}

/// A comparison between one sensor value and a fixed limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRule {
    pub id: String,
    pub name: String,
    pub sensor: String,
    pub operator: CompareOp,
    pub limit: f64,
    pub severity: Severity,
    /// Actuator to fire when the rule triggers.
    pub actuator: Option<String>,
}

impl ThresholdRule {
    /// Checks the rule against `reading`.
    ///
    /// Returns `Ok(None)` when the sensor is within limits.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::MissingSensor`] if the reading has no value for
    /// the rule's sensor.
    pub fn check(
        &self,
        reading: &SensorReading,
        now: DateTime<Utc>,
        locale: &str,
    ) -> Result<Option<AlertEvent>> {
        let sensor = reading
            .get(&self.sensor)
            .ok_or_else(|| AlertError::MissingSensor {
                rule_id: self.id.clone(),
                sensor: self.sensor.clone(),
            })?;

        if !self.operator.check(sensor.value, self.limit) {
            return Ok(None);
        }

        let unit = sensor.unit.to_string();
        let op = TRANSLATIONS.get(
            locale,
            self.operator.label_key(),
            self.operator.default_label(),
        );
        let tmpl = TRANSLATIONS.get(
            locale,
            "alert.threshold",
            "{rule}: {sensor} reading {value:.2}{unit} is {op} {limit:.2}{unit}",
        );
        let message = tmpl
            .replace("{rule}", &self.name)
            .replace("{sensor}", &self.sensor)
            .replace("{value:.2}", &format!("{:.2}", sensor.value))
            .replace("{limit:.2}", &format!("{:.2}", self.limit))
            .replace("{op}", op)
            .replace("{unit}", &unit);

        Ok(Some(AlertEvent {
            timestamp: now,
            rule_id: self.id.clone(),
            rule_name: self.name.clone(),
            sensor: self.sensor.clone(),
            value: sensor.value,
            limit: self.limit,
            severity: self.severity,
            message,
            actuator: self.actuator.clone(),
        }))
    }
}
