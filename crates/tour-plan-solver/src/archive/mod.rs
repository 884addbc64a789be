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

use crate::indicators::hypervolume;
use tour_plan_model::prelude::Solution;

/// Elitist archive of mutually non-dominated solutions.
///
/// Backed by a flat buffer in insertion order with a round-robin cursor
/// on the side. Above capacity the member contributing the least
/// exclusive hyper-volume is dropped, ties broken by lowest rating sum
/// and then lowest visit count.
#[derive(Debug, Clone)]
pub struct Archive {
    members: Vec<Solution>,
    capacity: usize,
    cursor: usize,
}

impl Archive {
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity.saturating_add(1)),
            capacity,
            cursor: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn solutions(&self) -> &[Solution] {
        &self.members
    }

    /// Objective points of all members, in minimization space.
    pub fn min_points(&self) -> Vec<[f64; 4]> {
        self.members
            .iter()
            .map(|s| s.objectives().as_min_point())
            .collect()
    }

    /// Offers a candidate to the archive. Dominated candidates are
    /// rejected; otherwise every member the candidate dominates is
    /// purged and the candidate joins, possibly followed by a
    /// truncation back to capacity. Returns `true` iff the archive
    /// changed.
    pub fn try_insert(&mut self, candidate: Solution) -> bool {
        if self
            .members
            .iter()
            .any(|m| m.dominates(&candidate) || m == &candidate)
        {
            return false;
        }

        self.members.retain(|m| !candidate.dominates(m));
        self.members.push(candidate);
        if self.members.len() > self.capacity {
            self.hv_truncate();
        }
        true
    }

    /// Members in insertion order, one per call, cycling forever.
    pub fn round_robin_next(&mut self) -> Option<Solution> {
        if self.members.is_empty() {
            return None;
        }
        if self.cursor >= self.members.len() {
            self.cursor = 0;
        }
        let picked = self.members[self.cursor].clone();
        self.cursor += 1;
        Some(picked)
    }

    /// Reference point for truncation: the worst value per objective
    /// across the archive, with a 10% slack on the minimization axes.
    fn truncation_reference(&self) -> [f64; 4] {
        let mut worst = [f64::NEG_INFINITY; 4];
        for p in self.min_points() {
            for d in 0..4 {
                worst[d] = worst[d].max(p[d]);
            }
        }
        // axes 2 and 3 carry minutes and cost; 0 and 1 are the negated
        // maximized objectives
        worst[2] += 0.1 * worst[2].abs();
        worst[3] += 0.1 * worst[3].abs();
        worst
    }

    fn hv_truncate(&mut self) {
        let reference = self.truncation_reference();
        while self.members.len() > self.capacity {
            let points = self.min_points();
            let total = hypervolume(&points, reference);

            let mut victim = 0;
            let mut victim_key = (f64::INFINITY, f64::INFINITY, u32::MAX);
            for i in 0..self.members.len() {
                let mut rest = points.clone();
                rest.remove(i);
                let contribution = total - hypervolume(&rest, reference);
                let objectives = self.members[i].objectives();
                let key = (contribution, objectives.rating, objectives.visits);
                if key.0 < victim_key.0
                    || (key.0 == victim_key.0 && key.1 < victim_key.1)
                    || (key.0 == victim_key.0 && key.1 == victim_key.1 && key.2 < victim_key.2)
                {
                    victim = i;
                    victim_key = key;
                }
            }
            self.members.remove(victim);
            if self.cursor > victim {
                self.cursor -= 1;
            }
        }
    }
}
