// src/search/sliding_window.rs
//
// Exhaustive histogram-guided pixel search, used on cold start or after a
// lost track. A column histogram over the bottom half of the image seeds one
// starting column per lane; stacked windows then walk upward, each band
// recentering on the pixels it found so the window chain follows the curve.

use crate::config::SearchConfig;
use crate::types::{BinaryImage, LanePixels};
use tracing::debug;

/// Starting columns for the left and right boundaries.
///
/// Column histogram of active pixels over the bottom half, split at the
/// horizontal midpoint; each half contributes its first-index argmax.
pub fn histogram_bases(image: &BinaryImage) -> (usize, usize) {
    let mut histogram = vec![0u32; image.width];
    for y in image.height / 2..image.height {
        for x in 0..image.width {
            if image.is_active(x, y) {
                histogram[x] += 1;
            }
        }
    }

    let midpoint = image.width / 2;
    let left_base = argmax(&histogram[..midpoint]);
    let right_base = argmax(&histogram[midpoint..]) + midpoint;
    (left_base, right_base)
}

/// First-index argmax: on ties the lowest column wins. An all-zero slice
/// yields index 0.
fn argmax(values: &[u32]) -> usize {
    let mut best_idx = 0;
    let mut best_val = 0u32;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

/// Collect candidate pixels for both boundaries with stacked sliding windows.
///
/// The image height is cut into `nwindows` equal bands bottom to top with
/// height floor(H / nwindows); leftover rows at the top fall outside every
/// window. Per band, each lane claims the active pixels within ±margin of
/// its tracking column, and recenters on their mean x when more than
/// `minpix` were found. A lane can come out empty — that is the caller's
/// miss to handle, not an error here.
pub fn find_lane_pixels(image: &BinaryImage, cfg: &SearchConfig) -> (LanePixels, LanePixels) {
    let (left_base, right_base) = histogram_bases(image);

    let window_height = image.height / cfg.nwindows;
    let mut left_current = left_base as i64;
    let mut right_current = right_base as i64;

    let mut left_pixels = LanePixels::default();
    let mut right_pixels = LanePixels::default();

    for window in 0..cfg.nwindows {
        let win_y_low = image.height - (window + 1) * window_height;
        let win_y_high = image.height - window * window_height;

        let left_lo = left_current as f64 - cfg.margin;
        let left_hi = left_current as f64 + cfg.margin;
        let right_lo = right_current as f64 - cfg.margin;
        let right_hi = right_current as f64 + cfg.margin;

        let mut left_band: Vec<(usize, usize)> = Vec::new();
        let mut right_band: Vec<(usize, usize)> = Vec::new();

        for y in win_y_low..win_y_high {
            for x in 0..image.width {
                if !image.is_active(x, y) {
                    continue;
                }
                let xf = x as f64;
                if xf >= left_lo && xf < left_hi {
                    left_band.push((x, y));
                }
                if xf >= right_lo && xf < right_hi {
                    right_band.push((x, y));
                }
            }
        }

        if cfg.log_search_windows {
            debug!(
                "window {}: y=[{},{}) left x=[{:.1},{:.1}) hits={} right x=[{:.1},{:.1}) hits={}",
                window,
                win_y_low,
                win_y_high,
                left_lo,
                left_hi,
                left_band.len(),
                right_lo,
                right_hi,
                right_band.len()
            );
        }

        // Recenter the next band on the mean x when enough pixels landed
        if left_band.len() > cfg.minpix {
            let sum: i64 = left_band.iter().map(|&(x, _)| x as i64).sum();
            left_current = sum / left_band.len() as i64;
        }
        if right_band.len() > cfg.minpix {
            let sum: i64 = right_band.iter().map(|&(x, _)| x as i64).sum();
            right_current = sum / right_band.len() as i64;
        }

        left_pixels.points.extend(left_band);
        right_pixels.points.extend(right_band);
    }

    (left_pixels, right_pixels)
}
