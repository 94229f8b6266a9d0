// src/tracking/mod.rs

mod lane_line;
mod pipeline;

pub use lane_line::LaneLine;
pub use pipeline::{FrameReport, LanePipeline};
