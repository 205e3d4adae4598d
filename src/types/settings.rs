//! Display settings persisted with the blob

use serde::{Deserialize, Serialize};

/// What the heatmap colours tiles by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapMode {
    /// Tile's historical win rate
    #[default]
    Pattern,
    /// Uniform chance that an unrevealed tile is a gem
    Probability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub heatmap_enabled: bool,
    pub heatmap_mode: HeatmapMode,
    /// 0.0-1.0
    pub heatmap_opacity: f64,
    pub show_tooltips: bool,
    pub color_blind_mode: bool,
    pub show_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            heatmap_enabled: true,
            heatmap_mode: HeatmapMode::Pattern,
            heatmap_opacity: 0.4,
            show_tooltips: true,
            color_blind_mode: false,
            show_controls: false,
        }
    }
}

impl Settings {
    /// Clamp out-of-range values coming from a host
    pub fn normalized(mut self) -> Self {
        if !self.heatmap_opacity.is_finite() {
            self.heatmap_opacity = Settings::default().heatmap_opacity;
        }
        self.heatmap_opacity = self.heatmap_opacity.clamp(0.0, 1.0);
        self
    }
}
