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

use crate::problem::{
    attraction::AttractionIdx,
    hotel::HotelIdx,
    matrix::{NodeIdx, TransportMode},
    prob::Problem,
};

/// One tour day: an ordered attraction sequence plus one transport mode
/// per leg.
///
/// A route with `m` attractions has `m + 1` legs: hotel to the first
/// attraction, between consecutive attractions, and back to the hotel.
/// An empty day keeps a single hotel-to-hotel leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRoute {
    attractions: Vec<AttractionIdx>,
    modes: Vec<TransportMode>,
}

impl Default for DayRoute {
    fn default() -> Self {
        Self::empty()
    }
}

impl DayRoute {
    #[inline]
    pub fn empty() -> Self {
        Self {
            attractions: Vec::new(),
            modes: vec![TransportMode::Walk],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attractions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }

    #[inline]
    pub fn num_legs(&self) -> usize {
        self.modes.len()
    }

    #[inline]
    pub fn attractions(&self) -> &[AttractionIdx] {
        &self.attractions
    }

    #[inline]
    pub fn modes(&self) -> &[TransportMode] {
        &self.modes
    }

    #[inline]
    pub fn attraction_at(&self, pos: usize) -> AttractionIdx {
        self.attractions[pos]
    }

    #[inline]
    pub fn mode_of_leg(&self, leg: usize) -> TransportMode {
        self.modes[leg]
    }

    #[inline]
    pub fn set_mode(&mut self, leg: usize, mode: TransportMode) {
        self.modes[leg] = mode;
    }

    /// Endpoints of a leg in the travel graph. Leg `i` runs into
    /// attraction `i`; the last leg returns to the hotel.
    pub fn leg_endpoints(&self, leg: usize, hotel: HotelIdx, problem: &Problem) -> (NodeIdx, NodeIdx) {
        let hotel_node = problem.hotel_node(hotel);
        let from = if leg == 0 {
            hotel_node
        } else {
            problem.attraction_node(self.attractions[leg - 1])
        };
        let to = if leg == self.attractions.len() {
            hotel_node
        } else {
            problem.attraction_node(self.attractions[leg])
        };
        (from, to)
    }

    /// Inserts an attraction at `pos`. The two legs around the new
    /// node are fresh; callers refit them via [`refit_leg`](Self::refit_leg)
    /// or [`refresh_modes`](Self::refresh_modes).
    pub fn insert(&mut self, pos: usize, attraction: AttractionIdx) {
        self.attractions.insert(pos, attraction);
        self.modes.insert(pos, TransportMode::Walk);
    }

    /// Sets a leg to the fastest feasible mode for its endpoints.
    /// Fresh legs created by insertion or substitution go through here.
    pub fn refit_leg(&mut self, leg: usize, hotel: HotelIdx, problem: &Problem) {
        let (from, to) = self.leg_endpoints(leg, hotel, problem);
        if let Some(mode) = problem.fastest_mode(from, to) {
            self.modes[leg] = mode;
        }
    }

    /// Replaces the attraction at `pos`, leaving the leg list alone.
    /// Both adjacent legs have new endpoints and need a refit.
    pub fn replace_at(&mut self, pos: usize, attraction: AttractionIdx) {
        self.attractions[pos] = attraction;
    }

    /// Removes and returns the attraction at `pos`; the merged leg
    /// keeps the incoming mode.
    pub fn remove_at(&mut self, pos: usize) -> AttractionIdx {
        let removed = self.attractions.remove(pos);
        self.modes.remove(pos + 1);
        removed
    }

    /// Drops and returns the last attraction, if any.
    pub fn pop(&mut self) -> Option<AttractionIdx> {
        if self.attractions.is_empty() {
            return None;
        }
        Some(self.remove_at(self.attractions.len() - 1))
    }

    pub fn push(&mut self, attraction: AttractionIdx) {
        let pos = self.attractions.len();
        self.insert(pos, attraction);
    }

    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.attractions.swap(i, j);
    }

    /// Reverses the attraction sub-sequence `[i..=j]`.
    pub fn reverse_segment(&mut self, i: usize, j: usize) {
        self.attractions[i..=j].reverse();
    }

    /// Re-derives the mode of every leg whose current mode is no
    /// longer feasible for its endpoints, falling back to the fastest
    /// feasible alternative. Modes that still work are kept.
    pub fn refresh_modes(&mut self, hotel: HotelIdx, problem: &Problem) {
        for leg in 0..self.modes.len() {
            let (from, to) = self.leg_endpoints(leg, hotel, problem);
            if problem.is_mode_feasible(from, to, self.modes[leg]) {
                continue;
            }
            if let Some(mode) = problem.fastest_mode(from, to) {
                self.modes[leg] = mode;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn a(i: usize) -> AttractionIdx {
        AttractionIdx::new(i)
    }

    #[test]
    fn test_empty_route_has_one_leg() {
        let r = DayRoute::empty();
        assert_eq!(r.len(), 0);
        assert_eq!(r.num_legs(), 1);
    }

    #[test]
    fn test_insert_keeps_leg_count_invariant() {
        let mut r = DayRoute::empty();
        r.push(a(0));
        r.push(a(1));
        r.insert(1, a(2));
        assert_eq!(r.len(), 3);
        assert_eq!(r.num_legs(), 4);
        assert_eq!(r.attractions(), &[a(0), a(2), a(1)]);
    }

    #[test]
    fn test_remove_keeps_leg_count_invariant() {
        let mut r = DayRoute::empty();
        r.push(a(0));
        r.push(a(1));
        r.push(a(2));
        assert_eq!(r.remove_at(1), a(1));
        assert_eq!(r.len(), 2);
        assert_eq!(r.num_legs(), 3);
    }

    #[test]
    fn test_double_swap_restores_route() {
        let mut r = DayRoute::empty();
        r.push(a(0));
        r.push(a(1));
        r.push(a(2));
        let before = r.clone();
        r.swap(0, 2);
        r.swap(0, 2);
        assert_eq!(r, before);
    }

    #[test]
    fn test_double_reverse_restores_route() {
        let mut r = DayRoute::empty();
        for i in 0..5 {
            r.push(a(i));
        }
        let before = r.clone();
        r.reverse_segment(1, 3);
        r.reverse_segment(1, 3);
        assert_eq!(r, before);
    }
}
