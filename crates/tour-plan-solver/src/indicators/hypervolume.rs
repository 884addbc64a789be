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

//! Exact dominated hyper-volume in minimization space.
//!
//! Implements the WFG exclusive-volume recursion (While, Bradstreet &
//! Barone, 2012): the volume of a front is the sum over points of the
//! point's inclusive box minus the volume of the remaining points
//! limited to it. Exact for any dimension; used here with d = 4. The
//! termination logic depends on exactness, so no sampling or
//! approximation is involved.

const D: usize = 4;

/// Dominated hyper-volume of `points` relative to `reference`, all in
/// minimization space (maximized objectives already negated). Points
/// at or beyond the reference on any axis contribute nothing.
pub fn hypervolume(points: &[[f64; D]], reference: [f64; D]) -> f64 {
    let mut front: Vec<[f64; D]> = points
        .iter()
        .copied()
        .filter(|p| inclusive_volume(*p, reference) > 0.0)
        .collect();
    front = nondominated(front);
    // processing larger boxes first keeps the limited sets small
    front.sort_by(|a, b| {
        inclusive_volume(*b, reference)
            .partial_cmp(&inclusive_volume(*a, reference))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    wfg(&front, reference)
}

fn wfg(front: &[[f64; D]], reference: [f64; D]) -> f64 {
    let mut total = 0.0;
    for (i, &p) in front.iter().enumerate() {
        let limited: Vec<[f64; D]> = front[i + 1..]
            .iter()
            .map(|q| {
                [
                    q[0].max(p[0]),
                    q[1].max(p[1]),
                    q[2].max(p[2]),
                    q[3].max(p[3]),
                ]
            })
            .collect();
        let limited = nondominated(limited);
        total += inclusive_volume(p, reference) - wfg(&limited, reference);
    }
    total
}

#[inline]
fn inclusive_volume(p: [f64; D], reference: [f64; D]) -> f64 {
    let mut v = 1.0;
    for d in 0..D {
        let side = reference[d] - p[d];
        if side <= 0.0 {
            return 0.0;
        }
        v *= side;
    }
    v
}

/// Weak dominance in minimization space.
#[inline]
fn dominates_min(a: &[f64; D], b: &[f64; D]) -> bool {
    let mut strict = false;
    for d in 0..D {
        if a[d] > b[d] {
            return false;
        }
        if a[d] < b[d] {
            strict = true;
        }
    }
    strict
}

fn nondominated(points: Vec<[f64; D]>) -> Vec<[f64; D]> {
    let mut kept: Vec<[f64; D]> = Vec::with_capacity(points.len());
    for p in &points {
        if points.iter().any(|q| dominates_min(q, p)) {
            continue;
        }
        if kept.contains(p) {
            continue;
        }
        kept.push(*p);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_front_has_zero_volume() {
        assert_eq!(hypervolume(&[], [1.0; 4]), 0.0);
    }

    #[test]
    fn test_single_point_box() {
        let hv = hypervolume(&[[0.0, 0.0, 0.0, 0.0]], [1.0, 2.0, 3.0, 4.0]);
        assert!((hv - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_beyond_reference_contributes_nothing() {
        let hv = hypervolume(&[[2.0, 0.0, 0.0, 0.0]], [1.0; 4]);
        assert_eq!(hv, 0.0);
    }

    #[test]
    fn test_dominated_point_adds_nothing() {
        let lone = hypervolume(&[[0.0; 4]], [1.0; 4]);
        let with_dominated = hypervolume(&[[0.0; 4], [0.5; 4]], [1.0; 4]);
        assert!((lone - with_dominated).abs() < 1e-9);
    }

    #[test]
    fn test_two_point_union_without_double_counting() {
        // boxes [0.0,1]x[0.5,1]^3 and [0.5,1]x[0.0,1]^3 overlap in [0.5,1]^4
        let points = [[0.0, 0.5, 0.5, 0.5], [0.5, 0.0, 0.0, 0.0]];
        let hv = hypervolume(&points, [1.0; 4]);
        let a = 1.0 * 0.5 * 0.5 * 0.5;
        let b = 0.5 * 1.0 * 1.0 * 1.0;
        let overlap = 0.5 * 0.5 * 0.5 * 0.5;
        assert!((hv - (a + b - overlap)).abs() < 1e-9);
    }

    #[test]
    fn test_volume_grows_with_new_nondominated_point() {
        let base = vec![[0.2, 0.8, 0.5, 0.5], [0.8, 0.2, 0.5, 0.5]];
        let hv_base = hypervolume(&base, [1.0; 4]);
        let mut more = base.clone();
        more.push([0.5, 0.5, 0.2, 0.2]);
        let hv_more = hypervolume(&more, [1.0; 4]);
        assert!(hv_more > hv_base);
    }

    #[test]
    fn test_duplicate_points_counted_once() {
        let hv1 = hypervolume(&[[0.3; 4]], [1.0; 4]);
        let hv2 = hypervolume(&[[0.3; 4], [0.3; 4]], [1.0; 4]);
        assert!((hv1 - hv2).abs() < 1e-12);
    }

    #[test]
    fn test_exactness_against_inclusion_exclusion() {
        // three mutually nondominated boxes, volume via inclusion-exclusion
        let p = [
            [0.1, 0.6, 0.4, 0.3],
            [0.5, 0.2, 0.6, 0.4],
            [0.7, 0.7, 0.1, 0.1],
        ];
        let r = [1.0; 4];
        let vol = |s: &[[f64; 4]]| -> f64 {
            // volume of the intersection of the dominated boxes
            let mut lo = [f64::MIN; 4];
            for q in s {
                for d in 0..4 {
                    lo[d] = lo[d].max(q[d]);
                }
            }
            (0..4).map(|d| (r[d] - lo[d]).max(0.0)).product()
        };
        let expected = vol(&[p[0]]) + vol(&[p[1]]) + vol(&[p[2]])
            - vol(&[p[0], p[1]])
            - vol(&[p[0], p[2]])
            - vol(&[p[1], p[2]])
            + vol(&p);
        let hv = hypervolume(&p, r);
        assert!((hv - expected).abs() < 1e-9);
    }
}
