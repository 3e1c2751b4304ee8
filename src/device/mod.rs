//! Device and environment context: TV model identity, per-setting menu
//! metadata, and room descriptors. Read-mostly; supplied at session start.

mod types;

pub use types::{
    Environment, PanelType, RoomLighting, SettingCategory, SettingMetadata, SettingType, TvModel,
    ViewingTime, WindowPosition,
};
