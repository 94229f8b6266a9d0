// src/tracking/lane_line.rs
//
// Temporal state for one lane boundary. Left and right are two instances of
// the same type, distinguished only by which pixels feed them.
//
// Accepted fits go into a bounded FIFO history; the smoothed fit is the
// unweighted mean of everything currently in the history, maintained through
// an incremental coefficient sum so a push/evict is O(1). The history is
// never cleared on a miss — stale entries only age out as later accepted
// frames push them over the capacity edge.

use crate::types::LaneFit;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct LaneLine {
    /// Most recent raw accepted fit.
    current_fit: Option<LaneFit>,
    /// Up to `capacity` past fits, oldest first.
    history: VecDeque<LaneFit>,
    /// Running coefficient sum over `history`.
    sum: LaneFit,
    capacity: usize,
    /// True only immediately after a frame accepted a fit for this boundary.
    pub detected: bool,
    /// Smoothed-fit x per evaluation row, for rendering downstream.
    pub best_x: Vec<f64>,
    /// Radius of curvature of the smoothed fit, in meters.
    pub curvature_radius_m: Option<f64>,
    /// Coefficient delta between the last two accepted fits.
    pub diffs: LaneFit,
}

impl LaneLine {
    pub fn new(capacity: usize) -> Self {
        Self {
            current_fit: None,
            history: VecDeque::with_capacity(capacity),
            sum: LaneFit::ZERO,
            capacity,
            detected: false,
            best_x: Vec::new(),
            curvature_radius_m: None,
            diffs: LaneFit::ZERO,
        }
    }

    /// Push an accepted raw fit, evicting the oldest entry at capacity.
    pub fn add_fit(&mut self, fit: LaneFit) {
        if let Some(prev) = self.current_fit {
            self.diffs = fit.sub(&prev);
        }
        self.current_fit = Some(fit);

        if self.history.len() == self.capacity {
            if let Some(evicted) = self.history.pop_front() {
                self.sum = self.sum.sub(&evicted);
            }
        }
        self.history.push_back(fit);
        self.sum = LaneFit {
            a: self.sum.a + fit.a,
            b: self.sum.b + fit.b,
            c: self.sum.c + fit.c,
        };
    }

    /// Mean of the current history contents; None while the history is empty.
    pub fn smoothed_fit(&self) -> Option<LaneFit> {
        if self.history.is_empty() {
            return None;
        }
        let n = self.history.len() as f64;
        Some(LaneFit {
            a: self.sum.a / n,
            b: self.sum.b / n,
            c: self.sum.c / n,
        })
    }

    pub fn current_fit(&self) -> Option<LaneFit> {
        self.current_fit
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Oldest-first view of the stored fits.
    pub fn history(&self) -> impl Iterator<Item = &LaneFit> {
        self.history.iter()
    }

    /// Evaluate the smoothed fit over the evaluation rows; no-op while the
    /// history is empty.
    pub fn compute_best_x(&mut self, eval_ys: &[f64]) {
        if let Some(fit) = self.smoothed_fit() {
            self.best_x = eval_ys.iter().map(|&y| fit.eval(y)).collect();
        }
    }

    /// Explicit external reset of the smoothing filter. Never called
    /// implicitly on a miss.
    pub fn reset_filter(&mut self) {
        self.history.clear();
        self.sum = LaneFit::ZERO;
        self.best_x.clear();
        self.curvature_radius_m = None;
        self.detected = false;
    }
}
