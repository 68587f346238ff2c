//! Pipeline stages and their supporting logic.

pub mod directions;
pub mod keeper;
pub mod paths;
pub mod render;
pub mod secrets;
pub mod settings;
pub mod static_map;
