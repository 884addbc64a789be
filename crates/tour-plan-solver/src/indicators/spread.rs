// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::indicators::{bounds, normalize};

/// Distribution uniformity of a front.
///
/// Points are normalized per axis, each point's nearest-neighbor gap is
/// measured, and the result is the mean absolute deviation of those
/// gaps relative to their mean. `0` means perfectly even spacing; large
/// values mean the front clusters. Fronts with fewer than three points
/// spread trivially and report `0`.
pub fn spread(points: &[[f64; 4]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let (lo, hi) = bounds(points);
    let normalized: Vec<[f64; 4]> = points.iter().map(|&p| normalize(p, lo, hi)).collect();

    let mut gaps = Vec::with_capacity(normalized.len());
    for (i, a) in normalized.iter().enumerate() {
        let mut nearest = f64::INFINITY;
        for (j, b) in normalized.iter().enumerate() {
            if i == j {
                continue;
            }
            let dist = euclidean(a, b);
            if dist < nearest {
                nearest = dist;
            }
        }
        gaps.push(nearest);
    }

    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    gaps.iter().map(|g| (g - mean).abs()).sum::<f64>() / (gaps.len() as f64 * mean)
}

#[inline]
pub(crate) fn euclidean(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    (0..4).map(|d| (a[d] - b[d]).powi(2)).sum::<f64>().sqrt()
}
