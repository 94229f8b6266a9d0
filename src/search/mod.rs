// src/search/mod.rs

mod around_poly;
mod sliding_window;

pub use around_poly::search_around_fits;
pub use sliding_window::{find_lane_pixels, histogram_bases};
