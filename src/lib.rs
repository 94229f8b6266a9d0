// src/lib.rs
//
// Lane boundary geometry estimation from binary top-down road images.
//
// The input is a perspective-corrected, thresholded frame (nonzero pixels =
// candidate lane markings). Per frame the pipeline:
//   1. Collects candidate pixels for the left and right boundaries, either
//      with an exhaustive histogram-guided sliding-window search (cold start,
//      lost track) or a cheap search around the previous polynomial (warm).
//   2. Fits a quadratic x = a·y² + b·y + c to each boundary.
//   3. Rejects fit pairs whose curves intersect inside the visible frame.
//   4. Smooths accepted fits over a bounded history and reports the
//      real-world radius of curvature at the row nearest the vehicle.
//
// Undistortion, the perspective warp, thresholding and all rendering live in
// the surrounding system; this crate only ever sees the warped binary image.

pub mod analysis;
pub mod config;
pub mod search;
pub mod tracking;
pub mod types;

pub use config::{Config, CurvatureConfig, SearchConfig, TrackingConfig};
pub use tracking::{FrameReport, LaneLine, LanePipeline};
pub use types::{BinaryImage, LaneFit, LanePixels, MissReason};
