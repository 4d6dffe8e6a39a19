//! Threshold evaluation and the bounded alert event log.
//!
//! [`evaluator::Evaluator`] turns one [`SensorReading`] plus the configured
//! [`rules::threshold::ThresholdRule`]s into [`AlertEvent`]s without side
//! effects. [`event_log::EventLog`] keeps the most recent events, newest
//! first, up to a fixed capacity.
//!
//! [`SensorReading`]: homeguard_common::types::SensorReading
//! [`AlertEvent`]: homeguard_common::types::AlertEvent

pub mod error;
pub mod evaluator;
pub mod event_log;
pub mod rules;
