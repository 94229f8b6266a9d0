// src/analysis/curvature.rs
//
// Real-world radius of curvature of a fitted boundary.
//
// The pixel-space fit x = a·y² + b·y + c is rescaled into meter space with
// fixed meters-per-pixel factors, then R = (1 + x′²)^1.5 / |x″| is evaluated
// at the row nearest the vehicle (largest y). A straight boundary has a ≈ 0
// and the radius diverges; that is reported as +∞, not an error — the
// caller treats very large radii as "effectively straight".

use crate::config::CurvatureConfig;
use crate::types::LaneFit;

/// Leading coefficients below this (in meter space) count as straight.
const STRAIGHT_EPS: f64 = 1e-12;

/// Radius of curvature in meters at pixel row `y_eval` (normally the bottom
/// row, the maximum of the evaluation y-sequence).
pub fn radius_of_curvature_m(fit: &LaneFit, y_eval: f64, cfg: &CurvatureConfig) -> f64 {
    // x = a·y² + b·y + c in pixels becomes, with x in meters of mx = xm·x
    // and y in meters of my = ym·y:
    //   mx = (xm/ym²)·a·my² + (xm/ym)·b·my + xm·c
    let a_m = fit.a * cfg.xm_per_pix / (cfg.ym_per_pix * cfg.ym_per_pix);
    let b_m = fit.b * cfg.xm_per_pix / cfg.ym_per_pix;

    if a_m.abs() < STRAIGHT_EPS {
        return f64::INFINITY;
    }

    let y_m = y_eval * cfg.ym_per_pix;
    let slope = 2.0 * a_m * y_m + b_m;
    (1.0 + slope * slope).powf(1.5) / (2.0 * a_m).abs()
}
