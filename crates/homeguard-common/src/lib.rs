//! Shared types for the homeguard workspace: sensor readings, alert events,
//! severity levels and the message translation table.

pub mod i18n;
pub mod types;
