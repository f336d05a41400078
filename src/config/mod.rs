//! Layout configuration.

pub mod layout;
pub mod options;

pub use layout::{LayoutConfig, ConfigError, DEPTH_DAMPENING, ALPHA_DECAY};
pub use options::LayoutOptions;
