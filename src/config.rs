// src/config.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub search: SearchConfig,
    pub tracking: TrackingConfig,
    pub curvature: CurvatureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of equal-height sliding-window bands, stacked bottom to top.
    pub nwindows: usize,
    /// Half-width of every search window, in pixels.
    pub margin: f64,
    /// Minimum pixels in a band to recenter the next window on their mean x.
    pub minpix: usize,
    /// Minimum mean separation (px) between left and right candidate sets;
    /// below this the warm search reports a miss.
    pub min_lane_separation_px: f64,
    /// Emit per-band window bounds and pixel counts through tracing::debug!.
    pub log_search_windows: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nwindows: 15,
            margin: 100.0,
            minpix: 50,
            min_lane_separation_px: 100.0,
            log_search_windows: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Capacity of the per-boundary fit history used for smoothing.
    pub history_depth: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { history_depth: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvatureConfig {
    /// Meters per pixel, vertical.
    pub ym_per_pix: f64,
    /// Meters per pixel, horizontal.
    pub xm_per_pix: f64,
}

impl Default for CurvatureConfig {
    fn default() -> Self {
        Self {
            ym_per_pix: 30.0 / 720.0,
            xm_per_pix: 3.7 / 910.0,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.search.nwindows, 15);
        assert_eq!(cfg.search.margin, 100.0);
        assert_eq!(cfg.search.minpix, 50);
        assert_eq!(cfg.tracking.history_depth, 30);
        assert!((cfg.curvature.ym_per_pix - 30.0 / 720.0).abs() < 1e-12);
        assert!((cfg.curvature.xm_per_pix - 3.7 / 910.0).abs() < 1e-12);
    }

    #[test]
    fn test_yaml_round_trip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.search.nwindows, cfg.search.nwindows);
        assert_eq!(back.tracking.history_depth, cfg.tracking.history_depth);
    }
}
