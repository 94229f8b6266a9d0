// src/analysis/mod.rs

mod curvature;
mod fitting;
mod plausibility;

pub use curvature::radius_of_curvature_m;
pub use fitting::{eval_ys, fit_quadratic};
pub use plausibility::lanes_intersect_in_frame;
