// src/analysis/plausibility.rs
//
// Parallelism check on a candidate fit pair. Two lane boundaries that
// intersect (or nearly intersect) inside the visible frame are not acting as
// parallel lane edges, so the frame is rejected even when both fits
// succeeded numerically.
//
// The test solves (left − right) = 0 as a quadratic in y, allowing complex
// roots, and compares the root magnitudes against the frame bounds. Note the
// inherited asymmetry: the first root is bounded by the image WIDTH and the
// second by the image HEIGHT. Kept as-is until proven wrong in the field —
// far-away or complex intersections have large magnitudes either way.

use crate::types::LaneFit;
use tracing::debug;

const COEFF_EPS: f64 = 1e-12;

/// True when the two fitted curves intersect inside the visible frame,
/// i.e. the pair is implausible as lane boundaries.
pub fn lanes_intersect_in_frame(
    left: &LaneFit,
    right: &LaneFit,
    width: usize,
    height: usize,
) -> bool {
    let d = left.sub(right);

    let implausible = match root_magnitudes(&d) {
        RootMagnitudes::Two(m0, m1) => m0 < width as f64 && m1 < height as f64,
        // Linear difference: a single crossing row; bound it by both axes.
        RootMagnitudes::One(m) => m < width as f64 && m < height as f64,
        // Constant nonzero difference: the curves never meet.
        RootMagnitudes::None => false,
        // Identical coefficients: the curves coincide everywhere.
        RootMagnitudes::Everywhere => true,
    };

    if implausible {
        debug!(
            "⚠️ Fit pair rejected: curves meet inside {}x{} frame (Δa={:.3e} Δb={:.3e} Δc={:.3e})",
            width, height, d.a, d.b, d.c
        );
    }
    implausible
}

enum RootMagnitudes {
    /// |r₀|, |r₁| of a true quadratic, r₀ = (−b+√disc)/2a, r₁ = (−b−√disc)/2a.
    Two(f64, f64),
    One(f64),
    None,
    Everywhere,
}

fn root_magnitudes(d: &LaneFit) -> RootMagnitudes {
    if d.a.abs() > COEFF_EPS {
        let disc = d.b * d.b - 4.0 * d.a * d.c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            let r0 = (-d.b + sq) / (2.0 * d.a);
            let r1 = (-d.b - sq) / (2.0 * d.a);
            RootMagnitudes::Two(r0.abs(), r1.abs())
        } else {
            // Complex conjugate pair: |r|² = r·r̄ = c/a for both roots.
            let mag = (d.c / d.a).sqrt();
            RootMagnitudes::Two(mag, mag)
        }
    } else if d.b.abs() > COEFF_EPS {
        RootMagnitudes::One((-d.c / d.b).abs())
    } else if d.c.abs() > COEFF_EPS {
        RootMagnitudes::None
    } else {
        RootMagnitudes::Everywhere
    }
}
