// src/types.rs

/// Thresholded top-down image. Nonzero pixels are candidate lane markings.
///
/// Width and height are fixed for a tracking session; the image is not
/// mutated during a frame.
#[derive(Debug, Clone)]
pub struct BinaryImage {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl BinaryImage {
    /// All-inactive image of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap a row-major buffer. Returns None when the buffer length does not
    /// match the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    #[inline]
    pub fn is_active(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    /// Iterate over all active pixel coordinates, row by row.
    pub fn active_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.data.iter().enumerate().filter_map(|(idx, &v)| {
            if v != 0 {
                Some((idx % self.width, idx / self.width))
            } else {
                None
            }
        })
    }
}

/// Candidate pixels assigned to one lane boundary. May be empty — an empty
/// set is a recoverable miss, never a panic.
#[derive(Debug, Clone, Default)]
pub struct LanePixels {
    pub points: Vec<(usize, usize)>,
}

impl LanePixels {
    #[inline]
    pub fn push(&mut self, x: usize, y: usize) {
        self.points.push((x, y));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean x of the set, None when empty.
    pub fn mean_x(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|&(x, _)| x as f64).sum();
        Some(sum / self.points.len() as f64)
    }

    /// Number of distinct y rows covered. A quadratic fit needs at least 3.
    pub fn distinct_y_count(&self) -> usize {
        let mut ys: Vec<usize> = self.points.iter().map(|&(_, y)| y).collect();
        ys.sort_unstable();
        ys.dedup();
        ys.len()
    }
}

/// Quadratic lane boundary fit: x = a·y² + b·y + c, with y the image row
/// (increasing downward) and x the column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LaneFit {
    /// Placeholder substituted when a cold-start fit fails. Only ever a
    /// per-frame stand-in so downstream evaluation stays defined; "no prior
    /// fit at all" is an `Option::None`, never this value.
    pub const SEED: Self = Self {
        a: 1.0,
        b: 1.0,
        c: 1.0,
    };

    pub const ZERO: Self = Self {
        a: 0.0,
        b: 0.0,
        c: 0.0,
    };

    #[inline]
    pub fn eval(&self, y: f64) -> f64 {
        self.a * y * y + self.b * y + self.c
    }

    /// Coefficient-wise difference.
    pub fn sub(&self, other: &LaneFit) -> LaneFit {
        LaneFit {
            a: self.a - other.a,
            b: self.b - other.b,
            c: self.c - other.c,
        }
    }
}

/// Why a frame failed to produce an accepted fit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// A boundary's pixel search produced zero points.
    EmptyCandidateSet,
    /// Mean separation of the two candidate sets is below the plausible
    /// lane width (curves too close or crossed).
    LanesTooClose,
    /// Fewer than 3 distinct y rows — the quadratic is underdetermined.
    InsufficientPoints,
    /// Fit succeeded numerically but the curves intersect inside the frame.
    ImplausibleGeometry,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyCandidateSet => "EMPTY_CANDIDATE_SET",
            Self::LanesTooClose => "LANES_TOO_CLOSE",
            Self::InsufficientPoints => "INSUFFICIENT_POINTS",
            Self::ImplausibleGeometry => "IMPLAUSIBLE_GEOMETRY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_image_active_pixels() {
        let mut img = BinaryImage::new(4, 3);
        img.set(1, 0, 255);
        img.set(3, 2, 1);
        let pixels: Vec<_> = img.active_pixels().collect();
        assert_eq!(pixels, vec![(1, 0), (3, 2)]);
        assert!(img.is_active(1, 0));
        assert!(!img.is_active(0, 0));
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        assert!(BinaryImage::from_raw(4, 3, vec![0; 11]).is_none());
        assert!(BinaryImage::from_raw(4, 3, vec![0; 12]).is_some());
    }

    #[test]
    fn test_lane_pixels_stats() {
        let mut px = LanePixels::default();
        px.push(100, 0);
        px.push(200, 0);
        px.push(300, 5);
        assert_eq!(px.mean_x(), Some(200.0));
        assert_eq!(px.distinct_y_count(), 2);
        assert!(LanePixels::default().mean_x().is_none());
    }

    #[test]
    fn test_fit_eval() {
        let fit = LaneFit {
            a: 2.0,
            b: -1.0,
            c: 10.0,
        };
        assert_eq!(fit.eval(0.0), 10.0);
        assert_eq!(fit.eval(3.0), 2.0 * 9.0 - 3.0 + 10.0);
        let d = fit.sub(&LaneFit::SEED);
        assert_eq!(d.a, 1.0);
        assert_eq!(d.b, -2.0);
        assert_eq!(d.c, 9.0);
    }
}
