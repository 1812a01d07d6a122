pub const PROJECT_NAME: &str = "flowpath";

pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod path;
pub mod settings;
pub mod string;
pub mod templates;

pub use config::{widget::WidgetData, Config, ConfigKey};
pub use engine::{BuildOutput, PathBuilder};
pub use errors::{Error, Result};
