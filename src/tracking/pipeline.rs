// src/tracking/pipeline.rs
//
// Per-frame orchestration and the cold/warm search switch.
//
// The pipeline holds the only mutable state of a tracking session: the two
// LaneLine instances and the prior-fit flag. With no usable prior it runs
// the exhaustive sliding-window search; once a frame is accepted it switches
// to the cheap corridor search, and any miss (empty set, implausible
// geometry, lanes too close) drops it back to the exhaustive search on the
// next frame. Exhaustive search is expensive but survives a complete loss
// of track; corridor search is cheap but only as good as its prior.

use crate::analysis::{eval_ys, fit_quadratic, lanes_intersect_in_frame, radius_of_curvature_m};
use crate::config::Config;
use crate::search::{find_lane_pixels, search_around_fits};
use crate::tracking::LaneLine;
use crate::types::{BinaryImage, LaneFit, LanePixels, MissReason};
use tracing::{debug, info};

/// Outcome of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// True when the frame produced an accepted, plausible fit pair.
    pub accepted: bool,
    pub miss: Option<MissReason>,
    /// Raw (unsmoothed) fit pair of this frame. On a warm-search miss these
    /// are the prior fits passed through unchanged; on a cold-start failure
    /// the failing side carries the seed placeholder.
    pub left_fit: LaneFit,
    pub right_fit: LaneFit,
    /// Whether the next frame will use the corridor search.
    pub has_prior_fit: bool,
}

pub struct LanePipeline {
    config: Config,
    left: LaneLine,
    right: LaneLine,
    has_prior_fit: bool,
    eval_ys: Vec<f64>,
    frame_count: u64,
}

impl LanePipeline {
    pub fn new(config: Config) -> Self {
        let depth = config.tracking.history_depth;
        Self {
            config,
            left: LaneLine::new(depth),
            right: LaneLine::new(depth),
            has_prior_fit: false,
            eval_ys: Vec::new(),
            frame_count: 0,
        }
    }

    /// Process one binary top-down frame. The single per-frame entry point;
    /// the caller keeps its inverse-perspective handle and visualization
    /// buffers, which never enter the pipeline.
    pub fn process_frame(&mut self, image: &BinaryImage) -> FrameReport {
        self.frame_count += 1;
        if self.eval_ys.len() != image.height {
            self.eval_ys = eval_ys(image.height);
        }

        let priors = match (self.left.smoothed_fit(), self.right.smoothed_fit()) {
            (Some(l), Some(r)) if self.has_prior_fit => Some((l, r)),
            _ => None,
        };

        let (left_fit, right_fit, mut miss) = match priors {
            Some((prior_left, prior_right)) => {
                self.warm_search(image, &prior_left, &prior_right)
            }
            None => self.cold_search(image),
        };

        if miss.is_none()
            && lanes_intersect_in_frame(&left_fit, &right_fit, image.width, image.height)
        {
            miss = Some(MissReason::ImplausibleGeometry);
        }

        if miss.is_none() {
            self.accept(left_fit, right_fit, image.height);
        } else {
            self.left.detected = false;
            self.right.detected = false;
            self.has_prior_fit = false;
        }

        if let Some(reason) = miss {
            debug!(
                "frame {}: miss ({}) — next frame restarts cold",
                self.frame_count,
                reason.as_str()
            );
        } else if self.frame_count % 150 == 0 {
            info!(
                "📐 frame {}: L(a={:.3e} c={:.1}) R(a={:.3e} c={:.1}) radius L={:.0}m R={:.0}m",
                self.frame_count,
                left_fit.a,
                left_fit.c,
                right_fit.a,
                right_fit.c,
                self.left.curvature_radius_m.unwrap_or(f64::INFINITY),
                self.right.curvature_radius_m.unwrap_or(f64::INFINITY),
            );
        }

        FrameReport {
            accepted: miss.is_none(),
            miss,
            left_fit,
            right_fit,
            has_prior_fit: self.has_prior_fit,
        }
    }

    /// Sliding-window search plus an independent fit per boundary. A
    /// boundary that yields no pixels or an underdetermined fit gets a fresh
    /// seed placeholder so downstream evaluation stays defined, and the
    /// frame is a miss.
    fn cold_search(&self, image: &BinaryImage) -> (LaneFit, LaneFit, Option<MissReason>) {
        let (left_px, right_px) = find_lane_pixels(image, &self.config.search);

        let mut miss = None;
        let left_fit = Self::fit_or_seed(&left_px, &mut miss);
        let right_fit = Self::fit_or_seed(&right_px, &mut miss);
        (left_fit, right_fit, miss)
    }

    fn fit_or_seed(pixels: &LanePixels, miss: &mut Option<MissReason>) -> LaneFit {
        if pixels.is_empty() {
            miss.get_or_insert(MissReason::EmptyCandidateSet);
            return LaneFit::SEED;
        }
        match fit_quadratic(pixels) {
            Some(fit) => fit,
            None => {
                miss.get_or_insert(MissReason::InsufficientPoints);
                LaneFit::SEED
            }
        }
    }

    /// Corridor search around the smoothed prior fits. On any failure the
    /// priors pass through unchanged and no refit happens.
    fn warm_search(
        &self,
        image: &BinaryImage,
        prior_left: &LaneFit,
        prior_right: &LaneFit,
    ) -> (LaneFit, LaneFit, Option<MissReason>) {
        match search_around_fits(image, prior_left, prior_right, &self.config.search) {
            Ok((left_px, right_px)) => {
                match (fit_quadratic(&left_px), fit_quadratic(&right_px)) {
                    (Some(l), Some(r)) => (l, r, None),
                    _ => (
                        *prior_left,
                        *prior_right,
                        Some(MissReason::InsufficientPoints),
                    ),
                }
            }
            Err(reason) => (*prior_left, *prior_right, Some(reason)),
        }
    }

    fn accept(&mut self, left_fit: LaneFit, right_fit: LaneFit, height: usize) {
        let y_eval = (height.saturating_sub(1)) as f64;

        for (line, fit) in [(&mut self.left, left_fit), (&mut self.right, right_fit)] {
            line.add_fit(fit);
            line.detected = true;
            line.compute_best_x(&self.eval_ys);
            if let Some(smoothed) = line.smoothed_fit() {
                line.curvature_radius_m = Some(radius_of_curvature_m(
                    &smoothed,
                    y_eval,
                    &self.config.curvature,
                ));
            }
        }
        self.has_prior_fit = true;
    }

    /// Explicit session reset: clears both smoothing filters and drops back
    /// to the exhaustive search.
    pub fn reset(&mut self) {
        self.left.reset_filter();
        self.right.reset_filter();
        self.has_prior_fit = false;
    }

    pub fn left(&self) -> &LaneLine {
        &self.left
    }

    pub fn right(&self) -> &LaneLine {
        &self.right
    }

    /// Evaluation rows of the current session, one per image row.
    pub fn eval_ys(&self) -> &[f64] {
        &self.eval_ys
    }

    pub fn has_prior_fit(&self) -> bool {
        self.has_prior_fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_columns(width: usize, height: usize, columns: &[usize]) -> BinaryImage {
        let mut img = BinaryImage::new(width, height);
        for &x in columns {
            for y in 0..height {
                img.set(x, y, 255);
            }
        }
        img
    }

    #[test]
    fn test_first_frame_cold_start_accepts() {
        let mut pipeline = LanePipeline::new(Config::default());
        assert!(!pipeline.has_prior_fit());

        let img = frame_with_columns(1280, 720, &[300, 900]);
        let report = pipeline.process_frame(&img);

        assert!(report.accepted, "miss: {:?}", report.miss);
        assert!(report.has_prior_fit);
        assert!(pipeline.left().detected);
        assert!(pipeline.right().detected);
        assert_eq!(pipeline.left().history_len(), 1);
        assert_eq!(pipeline.eval_ys().len(), 720);

        let left = pipeline.left().smoothed_fit().unwrap();
        let right = pipeline.right().smoothed_fit().unwrap();
        assert!((left.c - 300.0).abs() < 2.0, "left c={}", left.c);
        assert!((right.c - 900.0).abs() < 2.0, "right c={}", right.c);

        // vertical markings are effectively straight
        assert!(pipeline.left().curvature_radius_m.unwrap() > 1e6);
    }

    #[test]
    fn test_static_input_does_not_drift() {
        let mut pipeline = LanePipeline::new(Config::default());
        let img = frame_with_columns(1280, 720, &[300, 900]);

        let first = pipeline.process_frame(&img);
        assert!(first.accepted);
        let baseline = pipeline.left().smoothed_fit().unwrap();

        // frames 2–5 run the corridor search off the prior fit
        for i in 2..=5 {
            let report = pipeline.process_frame(&img);
            assert!(report.accepted, "frame {} miss: {:?}", i, report.miss);
            assert!(report.has_prior_fit);
            let smoothed = pipeline.left().smoothed_fit().unwrap();
            assert!(
                (smoothed.c - baseline.c).abs() < 1e-6,
                "smoothed fit drifted on unchanged input: {} vs {}",
                smoothed.c,
                baseline.c
            );
        }
        assert_eq!(pipeline.left().history_len(), 5);
    }

    #[test]
    fn test_empty_frame_is_a_cold_miss() {
        let mut pipeline = LanePipeline::new(Config::default());
        let report = pipeline.process_frame(&BinaryImage::new(1280, 720));

        assert!(!report.accepted);
        assert_eq!(report.miss, Some(MissReason::EmptyCandidateSet));
        assert_eq!(report.left_fit, LaneFit::SEED);
        assert_eq!(report.right_fit, LaneFit::SEED);
        assert!(!report.has_prior_fit);
        assert_eq!(pipeline.left().history_len(), 0);
    }

    #[test]
    fn test_miss_drops_track_but_keeps_history() {
        let mut pipeline = LanePipeline::new(Config::default());
        let img = frame_with_columns(1280, 720, &[300, 900]);

        assert!(pipeline.process_frame(&img).accepted);
        let smoothed_before = pipeline.left().smoothed_fit().unwrap();

        // lost markings: warm corridor search comes up empty
        let report = pipeline.process_frame(&BinaryImage::new(1280, 720));
        assert!(!report.accepted);
        assert_eq!(report.miss, Some(MissReason::EmptyCandidateSet));
        assert!(!pipeline.left().detected);
        assert!(!pipeline.has_prior_fit());
        // prior fits pass through unchanged on a warm miss
        assert!((report.left_fit.c - smoothed_before.c).abs() < 1e-9);

        // the filter is NOT cleared by a miss
        assert_eq!(pipeline.left().history_len(), 1);
        assert!(pipeline.left().smoothed_fit().is_some());

        // and the next good frame recovers via the exhaustive search
        let recovery = pipeline.process_frame(&img);
        assert!(recovery.accepted);
        assert!(pipeline.has_prior_fit());
        assert_eq!(pipeline.left().history_len(), 2);
    }

    #[test]
    fn test_coincident_lanes_rejected_as_implausible() {
        // Two markings 42px apart: both window chains swallow both columns,
        // the fits coincide, and the validator rejects the pair.
        let mut pipeline = LanePipeline::new(Config::default());
        let img = frame_with_columns(1280, 720, &[600, 642]);
        let report = pipeline.process_frame(&img);

        assert!(!report.accepted);
        assert_eq!(report.miss, Some(MissReason::ImplausibleGeometry));
        assert!(!pipeline.has_prior_fit());
        assert_eq!(pipeline.left().history_len(), 0);
    }

    #[test]
    fn test_reset_returns_to_cold_search() {
        let mut pipeline = LanePipeline::new(Config::default());
        let img = frame_with_columns(1280, 720, &[300, 900]);
        pipeline.process_frame(&img);
        pipeline.process_frame(&img);
        assert_eq!(pipeline.left().history_len(), 2);

        pipeline.reset();
        assert!(!pipeline.has_prior_fit());
        assert_eq!(pipeline.left().history_len(), 0);
        assert!(pipeline.left().smoothed_fit().is_none());

        let report = pipeline.process_frame(&img);
        assert!(report.accepted);
        assert_eq!(pipeline.left().history_len(), 1);
    }
}
