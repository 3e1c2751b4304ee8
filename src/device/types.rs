use serde::{Deserialize, Serialize};

use crate::settings::SettingValue;

/// Ambient light level in the viewing room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomLighting {
    Bright,
    Dim,
    Dark,
}

/// Where the room's windows sit relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPosition {
    BehindTv,
    Side,
    BehindViewer,
    None,
}

/// When the TV is mostly watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewingTime {
    Day,
    Evening,
    Mixed,
}

/// Viewing-environment descriptors, supplied once at session start and
/// immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub room_lighting: RoomLighting,
    pub windows: WindowPosition,
    pub viewing_time: ViewingTime,
    pub distance_feet: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_types: Option<Vec<String>>,
}

/// Display panel technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelType {
    #[serde(rename = "OLED")]
    Oled,
    #[serde(rename = "QLED")]
    Qled,
    #[serde(rename = "LED")]
    Led,
    #[serde(rename = "Mini-LED")]
    MiniLed,
    #[serde(rename = "LCD")]
    Lcd,
    #[serde(rename = "Plasma")]
    Plasma,
}

/// Identity and descriptive metadata for one TV model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvModel {
    pub id: String,
    pub brand_id: String,
    pub model_number: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_type: Option<PanelType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_platform: Option<String>,
    /// How confident the research pipeline is in this model's data (0..=1).
    pub research_confidence: f64,
}

/// Which menu tier a setting lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingCategory {
    Basic,
    Advanced,
    Expert,
}

/// How a setting is adjusted in the vendor menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Slider,
    Dropdown,
    Toggle,
}

/// Per-model metadata for one adjustable setting: valid range, menu
/// location, and recommended values per room lighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingMetadata {
    pub id: String,
    pub model_id: String,
    pub setting_name: String,
    pub setting_category: SettingCategory,
    pub setting_type: SettingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<SettingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_bright_room: Option<SettingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_dim_room: Option<SettingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_dark_room: Option<SettingValue>,
    /// Menu breadcrumb, e.g. `["Settings", "Picture", "Expert Settings"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_path: Option<Vec<String>>,
    pub confidence: f64,
}
