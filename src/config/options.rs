//! Partial configuration overrides.

use serde::{Deserialize, Serialize};

/// Options accepted by [`crate::Sankey::configure`].
///
/// Unset fields leave the current configuration untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Layout width used for breadth scaling.
    pub width: Option<f64>,
    /// Node rectangle width.
    pub node_width: Option<f64>,
    /// Minimum vertical gap between stacked nodes.
    pub node_padding: Option<f64>,
    /// Drawable area as `[width, height]`.
    pub size: Option<[f64; 2]>,
    /// Relaxation rounds.
    pub iterations: Option<usize>,
    /// Link path curvature.
    pub curvature: Option<f64>,
}

impl LayoutOptions {
    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_json() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"nodeWidth": 20, "nodePadding": 4, "size": [300, 200]}"#)
                .unwrap();

        assert_eq!(options.node_width, Some(20.0));
        assert_eq!(options.node_padding, Some(4.0));
        assert_eq!(options.size, Some([300.0, 200.0]));
        assert_eq!(options.width, None);
        assert!(!options.is_empty());
        assert!(LayoutOptions::default().is_empty());
    }
}
