//! The homeguard poll-evaluate-dispatch pipeline.
//!
//! [`monitor::Monitor`] owns the sensor source, threshold rules, event log
//! and actuator gate and runs one tick at a time. [`scheduler::PollScheduler`]
//! drives it on a fixed interval. Presentation and export layers read the
//! monitor through its snapshot accessors; the monitor never calls them.

pub mod config;
pub mod error;
pub mod monitor;
pub mod rule_builder;
pub mod scheduler;
pub mod status;
