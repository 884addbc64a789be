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

use tour_plan_core::prelude::Money;

/// The four itinerary objectives.
///
/// `visits` and `rating` are maximized; `minutes` (travel + waiting +
/// visiting) and `cost` (entrance fees + fares) are minimized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveVector {
    pub visits: u32,
    pub rating: f64,
    pub minutes: i64,
    pub cost: Money,
}

impl ObjectiveVector {
    #[inline]
    pub const fn new(visits: u32, rating: f64, minutes: i64, cost: Money) -> Self {
        Self {
            visits,
            rating,
            minutes,
            cost,
        }
    }

    /// Pareto dominance: at least as good on every objective and
    /// strictly better on at least one. Equal vectors do not dominate
    /// each other.
    pub fn dominates(&self, other: &ObjectiveVector) -> bool {
        let at_least_as_good = self.visits >= other.visits
            && self.rating >= other.rating
            && self.minutes <= other.minutes
            && self.cost <= other.cost;
        let strictly_better = self.visits > other.visits
            || self.rating > other.rating
            || self.minutes < other.minutes
            || self.cost < other.cost;
        at_least_as_good && strictly_better
    }

    /// The vector mapped into pure-minimization space: maximized
    /// objectives are negated. Indicator code works on these points.
    #[inline]
    pub fn as_min_point(&self) -> [f64; 4] {
        [
            -(self.visits as f64),
            -self.rating,
            self.minutes as f64,
            self.cost,
        ]
    }

    /// Scalarization for weighted descent: smaller is better.
    #[inline]
    pub fn weighted_value(&self, weights: [f64; 4]) -> f64 {
        let p = self.as_min_point();
        weights[0] * p[0] + weights[1] * p[1] + weights[2] * p[2] + weights[3] * p[3]
    }
}

impl std::fmt::Display for ObjectiveVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "F(visits: {}, rating: {:.2}, minutes: {}, cost: {:.2})",
            self.visits, self.rating, self.minutes, self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn f(visits: u32, rating: f64, minutes: i64, cost: f64) -> ObjectiveVector {
        ObjectiveVector::new(visits, rating, minutes, cost)
    }

    #[test]
    fn test_dominates_all_better() {
        assert!(f(3, 12.0, 400, 50.0).dominates(&f(2, 10.0, 500, 60.0)));
    }

    #[test]
    fn test_dominates_requires_strict_improvement() {
        let a = f(3, 12.0, 400, 50.0);
        assert!(!a.dominates(&a));
    }

    #[test]
    fn test_incomparable_vectors() {
        let a = f(3, 12.0, 400, 50.0);
        let b = f(4, 11.0, 350, 80.0);
        assert!(!a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn test_minimized_axes_point_downward() {
        let better_time = f(3, 12.0, 300, 50.0);
        let worse_time = f(3, 12.0, 400, 50.0);
        assert!(better_time.dominates(&worse_time));
        assert!(!worse_time.dominates(&better_time));
    }

    #[test]
    fn test_weighted_value_prefers_dominating_vector() {
        let a = f(3, 12.0, 400, 50.0);
        let b = f(2, 10.0, 500, 60.0);
        let w = [0.25, 0.25, 0.25, 0.25];
        assert!(a.weighted_value(w) < b.weighted_value(w));
    }

    #[test]
    fn test_dominance_is_transitive_on_random_vectors() {
        // cheap randomized law check in lieu of a property-test harness
        let mut state: u64 = 0x9E3779B97F4A7C15;
        let mut next = || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            state
        };
        let mut vecs = Vec::new();
        for _ in 0..64 {
            let v = next();
            vecs.push(f(
                (v & 0x7) as u32,
                ((v >> 8) & 0xF) as f64,
                ((v >> 16) & 0xFF) as i64,
                ((v >> 24) & 0x3F) as f64,
            ));
        }
        for a in &vecs {
            assert!(!a.dominates(a));
            for b in &vecs {
                if a.dominates(b) {
                    assert!(!b.dominates(a));
                }
                for c in &vecs {
                    if a.dominates(b) && b.dominates(c) {
                        assert!(a.dominates(c));
                    }
                }
            }
        }
    }
}
