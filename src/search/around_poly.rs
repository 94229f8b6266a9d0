// src/search/around_poly.rs
//
// Fast warm-track pixel search. Instead of re-running the sliding windows,
// every active pixel is tested against a ±margin corridor around each lane's
// previous polynomial. Only valid when the prior fit is a good prior — the
// caller falls back to the sliding-window search after a miss.

use crate::config::SearchConfig;
use crate::types::{BinaryImage, LaneFit, LanePixels, MissReason};
use tracing::debug;

/// Collect candidate pixels inside the corridors around the prior fits.
///
/// A pixel may land in both corridors, one, or neither — no mutual
/// exclusion. The search is a miss when either corridor comes up empty or
/// when the mean separation of the two sets falls below the plausible lane
/// width (curves too close or crossed); the caller then keeps its prior fits
/// unchanged.
pub fn search_around_fits(
    image: &BinaryImage,
    left_fit: &LaneFit,
    right_fit: &LaneFit,
    cfg: &SearchConfig,
) -> Result<(LanePixels, LanePixels), MissReason> {
    let mut left_pixels = LanePixels::default();
    let mut right_pixels = LanePixels::default();

    for (x, y) in image.active_pixels() {
        let xd = x as f64;
        let yd = y as f64;

        let left_pred = left_fit.eval(yd);
        if xd > left_pred - cfg.margin && xd < left_pred + cfg.margin {
            left_pixels.push(x, y);
        }

        let right_pred = right_fit.eval(yd);
        if xd > right_pred - cfg.margin && xd < right_pred + cfg.margin {
            right_pixels.push(x, y);
        }
    }

    let (left_mean, right_mean) = match (left_pixels.mean_x(), right_pixels.mean_x()) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            debug!("corridor search found no pixels for at least one lane");
            return Err(MissReason::EmptyCandidateSet);
        }
    };

    if (right_mean - left_mean).abs() < cfg.min_lane_separation_px {
        debug!(
            "corridor search separation {:.1}px below {:.0}px minimum",
            (right_mean - left_mean).abs(),
            cfg.min_lane_separation_px
        );
        return Err(MissReason::LanesTooClose);
    }

    Ok((left_pixels, right_pixels))
}
