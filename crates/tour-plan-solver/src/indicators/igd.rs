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

use crate::indicators::{bounds, normalize, spread::euclidean};

/// Inverted generational distance: how far the reference front lies
/// from the current front, averaged over reference points. Reported
/// only; never drives termination.
pub fn inverted_generational_distance(
    reference: &[[f64; 4]],
    current: &[[f64; 4]],
) -> Option<f64> {
    if reference.is_empty() || current.is_empty() {
        return None;
    }

    let joint: Vec<[f64; 4]> = reference.iter().chain(current.iter()).copied().collect();
    let (lo, hi) = bounds(&joint);

    let total: f64 = reference
        .iter()
        .map(|r| {
            let r = normalize(*r, lo, hi);
            current
                .iter()
                .map(|c| euclidean(&r, &normalize(*c, lo, hi)))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    Some(total / reference.len() as f64)
}
