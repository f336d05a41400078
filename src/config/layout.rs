//! Layout configuration.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Floats are quantized to integers before hashing so that `params_hash`
//! does not depend on float formatting.

use serde::{Deserialize, Serialize};

use super::options::LayoutOptions;
use crate::canonical::{canonical_hash_hex, quantize};
use crate::LAYOUT_SCHEMA_VERSION;

/// Fraction of the available height the tightest layer may fill.
pub const DEPTH_DAMPENING: f64 = 0.95;

/// Per-round decay applied to the relaxation step size.
pub const ALPHA_DECAY: f64 = 0.99;

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A dimension is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// A dimension is negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// Nodes are at least as wide as the layout area, leaving no room to
    /// separate layers.
    #[error("node width {node_width} must be less than layout width {width}")]
    NodeWiderThanLayout {
        /// Configured node width.
        node_width: f64,
        /// Configured layout width.
        width: f64,
    },
    /// Curvature outside `[0, 1]`.
    #[error("curvature must lie in [0, 1], got {0}")]
    CurvatureOutOfRange(f64),
}

/// Quantized parameters for deterministic hashing.
#[derive(Debug, Clone, Serialize)]
struct QuantizedLayoutParams {
    version: &'static str,
    width: i64,
    height: i64,
    node_width: i64,
    node_padding: i64,
    iterations: usize,
    curvature: i64,
}

/// Immutable layout configuration threaded through every stage.
///
/// ## Parameters
///
/// - `width`: horizontal extent used for breadth scaling
/// - `height`: vertical extent nodes must fit in
/// - `node_width`: pixel width of each node rectangle
/// - `node_padding`: minimum vertical gap between stacked nodes
/// - `iterations`: relaxation rounds run by `layout`
/// - `curvature`: default control-point fraction for link paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Layout width in pixels.
    pub width: f64,
    /// Layout height in pixels.
    pub height: f64,
    /// Node width in pixels.
    pub node_width: f64,
    /// Minimum vertical gap between nodes in a layer.
    pub node_padding: f64,
    /// Relaxation rounds.
    pub iterations: usize,
    /// Link path curvature (0.0-1.0).
    pub curvature: f64,
}

impl LayoutConfig {
    /// Create a configuration for a `width` x `height` area.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set node width.
    pub fn with_node_width(mut self, node_width: f64) -> Self {
        self.node_width = node_width;
        self
    }

    /// Set node padding.
    pub fn with_node_padding(mut self, node_padding: f64) -> Self {
        self.node_padding = node_padding;
        self
    }

    /// Set the relaxation round count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set both dimensions of the drawable area.
    pub fn with_size(mut self, size: [f64; 2]) -> Self {
        self.width = size[0];
        self.height = size[1];
        self
    }

    /// Drawable area as `[width, height]`.
    pub fn size(&self) -> [f64; 2] {
        [self.width, self.height]
    }

    /// Return a copy with `options` applied and validated.
    ///
    /// `size` is applied before `width`, so an explicit `width` wins.
    pub fn apply(&self, options: &LayoutOptions) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        if let Some(size) = options.size {
            next = next.with_size(size);
        }
        if let Some(width) = options.width {
            next.width = width;
        }
        if let Some(node_width) = options.node_width {
            next.node_width = node_width;
        }
        if let Some(node_padding) = options.node_padding {
            next.node_padding = node_padding;
        }
        if let Some(iterations) = options.iterations {
            next.iterations = iterations;
        }
        if let Some(curvature) = options.curvature {
            next.curvature = curvature;
        }
        next.validate()?;
        Ok(next)
    }

    /// Check that every dimension is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("node_width", self.node_width),
            ("node_padding", self.node_padding),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.node_width >= self.width {
            return Err(ConfigError::NodeWiderThanLayout {
                node_width: self.node_width,
                width: self.width,
            });
        }
        if !(0.0..=1.0).contains(&self.curvature) {
            return Err(ConfigError::CurvatureOutOfRange(self.curvature));
        }
        Ok(())
    }

    /// Compute a hash of the configuration.
    ///
    /// Uses quantized float representation, so configurations that differ
    /// by less than 1e-6 hash identically.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.to_quantized())
    }

    fn to_quantized(&self) -> QuantizedLayoutParams {
        QuantizedLayoutParams {
            version: LAYOUT_SCHEMA_VERSION,
            width: quantize(self.width),
            height: quantize(self.height),
            node_width: quantize(self.node_width),
            node_padding: quantize(self.node_padding),
            iterations: self.iterations,
            curvature: quantize(self.curvature),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            node_width: 24.0,
            node_padding: 12.0,
            iterations: 32,
            curvature: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_apply_size_then_width() {
        let options = LayoutOptions {
            size: Some([800.0, 400.0]),
            width: Some(600.0),
            ..LayoutOptions::default()
        };
        let config = LayoutConfig::default().apply(&options).unwrap();

        assert_eq!(config.width, 600.0);
        assert_eq!(config.height, 400.0);
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let negative = LayoutOptions {
            node_padding: Some(-1.0),
            ..LayoutOptions::default()
        };
        assert_eq!(
            LayoutConfig::default().apply(&negative),
            Err(ConfigError::Negative { field: "node_padding", value: -1.0 })
        );

        let too_wide = LayoutOptions {
            node_width: Some(900.0),
            ..LayoutOptions::default()
        };
        assert!(matches!(
            LayoutConfig::default().apply(&too_wide),
            Err(ConfigError::NodeWiderThanLayout { .. })
        ));

        let nan = LayoutConfig { height: f64::NAN, ..LayoutConfig::default() };
        assert!(matches!(nan.validate(), Err(ConfigError::NonFinite { field: "height", .. })));

        let curved = LayoutConfig { curvature: 1.5, ..LayoutConfig::default() };
        assert_eq!(curved.validate(), Err(ConfigError::CurvatureOutOfRange(1.5)));
    }

    #[test]
    fn test_node_width_equal_to_width_rejected() {
        let flush = LayoutConfig::new(20.0, 100.0).with_node_width(20.0);
        assert_eq!(
            flush.validate(),
            Err(ConfigError::NodeWiderThanLayout { node_width: 20.0, width: 20.0 })
        );

        let empty = LayoutConfig::new(0.0, 100.0).with_node_width(0.0);
        assert!(empty.validate().is_err());

        assert!(LayoutConfig::new(20.5, 100.0).with_node_width(20.0).validate().is_ok());
    }

    #[test]
    fn test_params_hash_determinism() {
        let config1 = LayoutConfig::default();
        let config2 = LayoutConfig::default();

        assert_eq!(config1.params_hash(), config2.params_hash());
    }

    #[test]
    fn test_params_hash_changes() {
        let config1 = LayoutConfig::default();
        let config2 = LayoutConfig::default().with_node_padding(8.0);

        assert_ne!(config1.params_hash(), config2.params_hash());
    }
}
