//! Typed key/value model for a device's adjustable picture parameters.
//!
//! Keys are case-insensitive-normalized before storage; values are numbers
//! or vendor-specific text. States are produced, never mutated: a settings
//! change is `old_state.merge(&partial)`.

mod types;

pub use types::{normalize_key, SettingValue, Settings};
