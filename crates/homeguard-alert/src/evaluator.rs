use crate::error::AlertError;
use crate::rules::threshold::ThresholdRule;
use chrono::{DateTime, Utc};
use homeguard_common::i18n::{normalize_locale, DEFAULT_LOCALE};
use homeguard_common::types::{AlertEvent, SensorReading};

/// Outcome of evaluating one reading against a rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Fired rules, in rule declaration order.
    pub events: Vec<AlertEvent>,
    /// Rules skipped because their sensor was absent from the reading.
    pub missing: Vec<AlertError>,
}

/// Pure threshold evaluator.
///
/// The only state is the locale used to render event messages; the output
/// depends solely on the reading, the rules and `now`.
#[derive(Debug, Clone)]
pub struct Evaluator {
    locale: String,
}

impl Evaluator {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: normalize_locale(locale).to_string(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn evaluate(
        &self,
        reading: &SensorReading,
        rules: &[ThresholdRule],
        now: DateTime<Utc>,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();

        for rule in rules {
            match rule.check(reading, now, &self.locale) {
                Ok(Some(event)) => {
                    tracing::debug!(
                        rule_id = %rule.id,
                        sensor = %rule.sensor,
                        value = event.value,
                        severity = %event.severity,
                        "Threshold rule fired"
                    );
                    evaluation.events.push(event);
                }
                Ok(None) => {}
                Err(e) => evaluation.missing.push(e),
            }
        }

        evaluation
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

/// Evaluates `rules` against `reading` with the default locale.
pub fn evaluate(
    reading: &SensorReading,
    rules: &[ThresholdRule],
    now: DateTime<Utc>,
) -> Evaluation {
    Evaluator::default().evaluate(reading, rules, now)
}
