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

//! Quality indicators over objective points in minimization space.
//!
//! Every function here takes `[f64; 4]` points produced by
//! [`ObjectiveVector::as_min_point`](tour_plan_model::prelude::ObjectiveVector::as_min_point).

pub mod epsilon;
pub mod hypervolume;
pub mod igd;
pub mod monitor;
pub mod spread;

pub use epsilon::additive_epsilon;
pub use hypervolume::hypervolume;
pub use igd::inverted_generational_distance;
pub use monitor::{MonitorReport, QualityMonitor};
pub use spread::spread;

/// Per-axis bounds of a point cloud.
pub(crate) fn bounds(points: &[[f64; 4]]) -> ([f64; 4], [f64; 4]) {
    let mut lo = [f64::INFINITY; 4];
    let mut hi = [f64::NEG_INFINITY; 4];
    for p in points {
        for d in 0..4 {
            lo[d] = lo[d].min(p[d]);
            hi[d] = hi[d].max(p[d]);
        }
    }
    (lo, hi)
}

/// Maps a point into `[0, 1]^4` under the given bounds; degenerate
/// axes collapse to zero.
pub(crate) fn normalize(p: [f64; 4], lo: [f64; 4], hi: [f64; 4]) -> [f64; 4] {
    let mut out = [0.0; 4];
    for d in 0..4 {
        let range = hi[d] - lo[d];
        out[d] = if range > 0.0 { (p[d] - lo[d]) / range } else { 0.0 };
    }
    out
}
