// src/analysis/fitting.rs
//
// Least-squares quadratic fit of one lane boundary, x = a·y² + b·y + c with
// y as the independent variable (boundaries are near-vertical in the warped
// image, so x(y) is single-valued where y(x) is not).
//
// The normal equations are solved directly with a 3×3 Gaussian elimination;
// all accumulation is f64 since y⁴ terms reach ~10¹¹ at 720-row images.

use crate::types::{LaneFit, LanePixels};

/// Fit a quadratic to the candidate pixels of one boundary.
///
/// Returns None when the fit is underdetermined (fewer than 3 distinct y
/// rows) or the normal system is singular. Both are recoverable misses for
/// the caller, which substitutes the previous or seed fit.
pub fn fit_quadratic(pixels: &LanePixels) -> Option<LaneFit> {
    if pixels.distinct_y_count() < 3 {
        return None;
    }

    // Normal-equation sums: s_k = Σ yᵏ, sx_k = Σ x·yᵏ
    let n = pixels.len() as f64;
    let mut s1 = 0.0f64;
    let mut s2 = 0.0f64;
    let mut s3 = 0.0f64;
    let mut s4 = 0.0f64;
    let mut sx0 = 0.0f64;
    let mut sx1 = 0.0f64;
    let mut sx2 = 0.0f64;

    for &(x, y) in &pixels.points {
        let xd = x as f64;
        let yd = y as f64;
        let y2 = yd * yd;
        s1 += yd;
        s2 += y2;
        s3 += y2 * yd;
        s4 += y2 * y2;
        sx0 += xd;
        sx1 += xd * yd;
        sx2 += xd * y2;
    }

    //   | s4 s3 s2 | | a |   | sx2 |
    //   | s3 s2 s1 | | b | = | sx1 |
    //   | s2 s1 s0 | | c |   | sx0 |
    let (a, b, c) = solve_3x3([s4, s3, s2, s3, s2, s1, s2, s1, n], [sx2, sx1, sx0])?;

    Some(LaneFit { a, b, c })
}

/// One evaluation row per image row: 0.0, 1.0, …, (height − 1).
pub fn eval_ys(height: usize) -> Vec<f64> {
    (0..height).map(|y| y as f64).collect()
}

/// Solve Ax = b for a 3×3 row-major system with partial pivoting.
/// Returns None when the system is singular or the solution is non-finite.
fn solve_3x3(mat: [f64; 9], rhs: [f64; 3]) -> Option<(f64, f64, f64)> {
    let mut m = [
        [mat[0], mat[1], mat[2], rhs[0]],
        [mat[3], mat[4], mat[5], rhs[1]],
        [mat[6], mat[7], mat[8], rhs[2]],
    ];

    for col in 0..3 {
        let mut pivot_row = col;
        let mut pivot_val = m[col][col].abs();
        for row in (col + 1)..3 {
            if m[row][col].abs() > pivot_val {
                pivot_val = m[row][col].abs();
                pivot_row = row;
            }
        }

        if pivot_val < 1e-12 {
            return None;
        }
        if pivot_row != col {
            m.swap(col, pivot_row);
        }

        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for j in col..4 {
                m[row][j] -= factor * m[col][j];
            }
        }
    }

    if m[2][2].abs() < 1e-12 {
        return None;
    }
    let c = m[2][3] / m[2][2];
    let b = (m[1][3] - m[1][2] * c) / m[1][1];
    let a = (m[0][3] - m[0][2] * c - m[0][1] * b) / m[0][0];

    if a.is_finite() && b.is_finite() && c.is_finite() {
        Some((a, b, c))
    } else {
        None
    }
}
