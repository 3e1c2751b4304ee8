use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single picture-setting value.
///
/// TV menus are heterogeneous across vendors: most settings are sliders
/// (numbers), but dropdowns and toggles surface as text ("Warm2", "On").
/// The container accepts either per key; this is intentional, not an
/// error condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Coerce user-entered text into a value.
    ///
    /// Attempts a floating-point parse; on failure the original text is
    /// retained as-is.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) => SettingValue::Number(n),
            Err(_) => SettingValue::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) => Some(*n),
            SettingValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Number(_) => None,
            SettingValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

impl From<i32> for SettingValue {
    fn from(n: i32) -> Self {
        SettingValue::Number(n as f64)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

/// Canonicalize a setting name into a map key.
///
/// Lowercased, trimmed, with internal whitespace runs collapsed to a
/// single underscore, so two textual spellings of the same logical
/// setting never coexist as distinct keys. Idempotent.
pub fn normalize_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = !key.is_empty();
            continue;
        }
        if pending_sep {
            key.push('_');
            pending_sep = false;
        }
        for lower in ch.to_lowercase() {
            key.push(lower);
        }
    }
    key
}

/// A full snapshot of a device's adjustable picture parameters.
///
/// Keys are normalized at the boundary (see [`normalize_key`]). Snapshots
/// are never mutated once they land in a checkpoint; new states are
/// produced only by [`Settings::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under the normalized form of `name`.
    pub fn set(&mut self, name: &str, value: impl Into<SettingValue>) {
        self.values.insert(normalize_key(name), value.into());
    }

    /// Look up a value by setting name (normalized before lookup).
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(&normalize_key(name))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return a new state equal to `self` with every key present in
    /// `partial` overwritten; keys absent from `partial` are preserved.
    ///
    /// Pure: neither operand is mutated, and any key/value pair is
    /// accepted.
    pub fn merge(&self, partial: &Settings) -> Settings {
        let mut merged = self.values.clone();
        for (key, value) in &partial.values {
            merged.insert(key.clone(), value.clone());
        }
        Settings { values: merged }
    }
}

impl FromIterator<(String, SettingValue)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, SettingValue)>>(iter: I) -> Self {
        let mut settings = Settings::new();
        for (name, value) in iter {
            settings.set(&name, value);
        }
        settings
    }
}
