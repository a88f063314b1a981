//! Layout configuration.
//!
//! [`LayoutConfig`] is the immutable value object every generator receives.
//! It deserializes from the camelCase JSON the canvas sends, with every
//! field optional on the wire. [`LayoutConfigPatch`] carries partial
//! updates, both for persistent config changes and per-call overrides.

use serde::{Deserialize, Serialize};

/// Layout strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    #[default]
    Hierarchical,
    Force,
    Grid,
    Circular,
    Organic,
    Manual,
}

impl LayoutAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::Force => "force",
            Self::Grid => "grid",
            Self::Circular => "circular",
            Self::Organic => "organic",
            Self::Manual => "manual",
        }
    }

    /// Whether the layout assigns nodes to levels that should animate together.
    pub fn is_leveled(self) -> bool {
        matches!(self, Self::Hierarchical | Self::Organic)
    }
}

/// Main flow direction of level-based layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowDirection {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl FlowDirection {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl HorizontalAlignment {
    /// Fraction of free space placed before the aligned content.
    pub fn offset_factor(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

impl VerticalAlignment {
    pub fn offset_factor(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Middle => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            horizontal: 100.0,
            vertical: 80.0,
        }
    }
}

/// Parameters of the force simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceParams {
    /// Rest length of link springs.
    pub link_distance: f64,
    /// Spring stiffness (0..=1).
    pub link_strength: f64,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    /// Radius of the collision circle around each node.
    pub collision_radius: f64,
    /// Number of simulation ticks (fixed budget, no convergence test).
    pub iterations: u32,
    /// Seed for the initial position jitter.
    pub seed: u64,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            link_distance: 250.0,
            link_strength: 0.7,
            charge_strength: -1200.0,
            collision_radius: 120.0,
            iterations: 300,
            seed: 0x5eed,
        }
    }
}

/// Full layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub algorithm: LayoutAlgorithm,
    pub direction: FlowDirection,
    pub spacing: Spacing,
    pub padding: f64,
    pub alignment: Alignment,
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub magnetic_alignment: bool,
    pub magnetic_threshold: f64,
    pub animation_duration_ms: u64,
    /// Delay between consecutive node (or level) tweens.
    pub animation_stagger_ms: u64,
    pub auto_layout: bool,
    /// Sort nodes within a hierarchical level by label.
    pub sort_by_label: bool,
    /// Grid column count; `None` means `ceil(sqrt(n))`.
    pub grid_columns: Option<usize>,
    /// Center grid nodes in their cells, half the spacing in from the cell edge.
    pub center_in_cell: bool,
    /// Circle radius; `None` derives one from the node count.
    pub circular_radius: Option<f64>,
    pub force: ForceParams,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::Hierarchical,
            direction: FlowDirection::TopBottom,
            spacing: Spacing::default(),
            padding: 50.0,
            alignment: Alignment::default(),
            grid_size: 20.0,
            snap_to_grid: false,
            magnetic_alignment: true,
            magnetic_threshold: 10.0,
            animation_duration_ms: 300,
            animation_stagger_ms: 30,
            auto_layout: false,
            sort_by_label: false,
            grid_columns: None,
            center_in_cell: false,
            circular_radius: None,
            force: ForceParams::default(),
        }
    }
}

/// Partial update of a [`LayoutConfig`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfigPatch {
    pub algorithm: Option<LayoutAlgorithm>,
    pub direction: Option<FlowDirection>,
    pub spacing: Option<Spacing>,
    pub padding: Option<f64>,
    pub alignment: Option<Alignment>,
    pub grid_size: Option<f64>,
    pub snap_to_grid: Option<bool>,
    pub magnetic_alignment: Option<bool>,
    pub magnetic_threshold: Option<f64>,
    pub animation_duration_ms: Option<u64>,
    pub animation_stagger_ms: Option<u64>,
    pub auto_layout: Option<bool>,
    pub sort_by_label: Option<bool>,
    pub grid_columns: Option<usize>,
    pub center_in_cell: Option<bool>,
    pub circular_radius: Option<f64>,
    pub force: Option<ForceParams>,
}

impl LayoutConfig {
    /// A copy of `self` with every field present in `patch` replaced.
    ///
    /// Non-finite or negative geometry values in the patch are ignored.
    pub fn merged(&self, patch: &LayoutConfigPatch) -> Self {
        let mut config = self.clone();
        if let Some(v) = patch.algorithm {
            config.algorithm = v;
        }
        if let Some(v) = patch.direction {
            config.direction = v;
        }
        if let Some(v) = patch.spacing.filter(|s| valid_length(s.horizontal) && valid_length(s.vertical)) {
            config.spacing = v;
        }
        if let Some(v) = patch.padding.filter(|&v| valid_length(v)) {
            config.padding = v;
        }
        if let Some(v) = patch.alignment {
            config.alignment = v;
        }
        if let Some(v) = patch.grid_size.filter(|&v| valid_length(v) && v > 0.0) {
            config.grid_size = v;
        }
        if let Some(v) = patch.snap_to_grid {
            config.snap_to_grid = v;
        }
        if let Some(v) = patch.magnetic_alignment {
            config.magnetic_alignment = v;
        }
        if let Some(v) = patch.magnetic_threshold.filter(|&v| valid_length(v)) {
            config.magnetic_threshold = v;
        }
        if let Some(v) = patch.animation_duration_ms {
            config.animation_duration_ms = v;
        }
        if let Some(v) = patch.animation_stagger_ms {
            config.animation_stagger_ms = v;
        }
        if let Some(v) = patch.auto_layout {
            config.auto_layout = v;
        }
        if let Some(v) = patch.sort_by_label {
            config.sort_by_label = v;
        }
        if let Some(v) = patch.grid_columns.filter(|&v| v > 0) {
            config.grid_columns = Some(v);
        }
        if let Some(v) = patch.center_in_cell {
            config.center_in_cell = v;
        }
        if let Some(v) = patch.circular_radius.filter(|&v| valid_length(v)) {
            config.circular_radius = Some(v);
        }
        if let Some(v) = patch.force {
            config.force = v;
        }
        config
    }

    /// Copy of `self` with a different algorithm.
    pub fn with_algorithm(&self, algorithm: LayoutAlgorithm) -> Self {
        Self {
            algorithm,
            ..self.clone()
        }
    }
}

#[inline]
fn valid_length(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: LayoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(config.padding, 50.0);
        assert_eq!(config.grid_size, 20.0);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = r#"{"algorithm":"force","direction":"left-right","snapToGrid":true,"gridSize":25,"spacing":{"horizontal":40}}"#;
        let config: LayoutConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.algorithm, LayoutAlgorithm::Force);
        assert_eq!(config.direction, FlowDirection::LeftRight);
        assert!(config.snap_to_grid);
        assert_eq!(config.grid_size, 25.0);
        assert_eq!(config.spacing.horizontal, 40.0);
        assert_eq!(config.spacing.vertical, 80.0);
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let base = LayoutConfig::default();
        let patch = LayoutConfigPatch {
            padding: Some(10.0),
            snap_to_grid: Some(true),
            ..Default::default()
        };

        let merged = base.merged(&patch);
        assert_eq!(merged.padding, 10.0);
        assert!(merged.snap_to_grid);
        assert_eq!(merged.algorithm, base.algorithm);
        assert_eq!(merged.spacing, base.spacing);
    }

    #[test]
    fn test_merge_ignores_invalid_geometry() {
        let patch = LayoutConfigPatch {
            padding: Some(f64::NAN),
            grid_size: Some(0.0),
            ..Default::default()
        };
        let merged = LayoutConfig::default().merged(&patch);
        assert_eq!(merged.padding, 50.0);
        assert_eq!(merged.grid_size, 20.0);
    }
}
