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

use crate::problem::{attraction::AttractionIdx, hotel::HotelIdx};
use crate::solution::{objective::ObjectiveVector, route::DayRoute};

/// The genotype the search mutates: two day routes anchored at one
/// shared hotel. Objectives are not stored here; evaluation wraps an
/// itinerary into a [`Solution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    hotel: HotelIdx,
    days: [DayRoute; 2],
}

impl Itinerary {
    pub fn new(hotel: HotelIdx) -> Self {
        Self {
            hotel,
            days: [DayRoute::empty(), DayRoute::empty()],
        }
    }

    #[inline]
    pub fn hotel(&self) -> HotelIdx {
        self.hotel
    }

    #[inline]
    pub fn set_hotel(&mut self, hotel: HotelIdx) {
        self.hotel = hotel;
    }

    #[inline]
    pub fn day(&self, d: usize) -> &DayRoute {
        &self.days[d]
    }

    #[inline]
    pub fn day_mut(&mut self, d: usize) -> &mut DayRoute {
        &mut self.days[d]
    }

    #[inline]
    pub fn days(&self) -> &[DayRoute; 2] {
        &self.days
    }

    /// Attractions across both days, in visiting order.
    pub fn visited(&self) -> impl Iterator<Item = AttractionIdx> + '_ {
        self.days.iter().flat_map(|r| r.attractions().iter().copied())
    }

    #[inline]
    pub fn num_attractions(&self) -> usize {
        self.days[0].len() + self.days[1].len()
    }

    pub fn contains(&self, attraction: AttractionIdx) -> bool {
        self.visited().any(|a| a == attraction)
    }

    /// Both days reduced to the bare hotel stay.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.days[0].is_empty() && self.days[1].is_empty()
    }
}

/// An evaluated itinerary with its memoized objective vector. Only the
/// evaluator constructs these, so the memo always matches a fresh
/// recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    itinerary: Itinerary,
    objectives: ObjectiveVector,
}

impl Solution {
    pub fn new(itinerary: Itinerary, objectives: ObjectiveVector) -> Self {
        Self {
            itinerary,
            objectives,
        }
    }

    #[inline]
    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    #[inline]
    pub fn objectives(&self) -> ObjectiveVector {
        self.objectives
    }

    #[inline]
    pub fn into_itinerary(self) -> Itinerary {
        self.itinerary
    }

    #[inline]
    pub fn dominates(&self, other: &Solution) -> bool {
        self.objectives.dominates(&other.objectives)
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
    fn test_new_itinerary_is_empty() {
        let it = Itinerary::new(HotelIdx::new(0));
        assert!(it.is_empty());
        assert_eq!(it.num_attractions(), 0);
    }

    #[test]
    fn test_contains_looks_across_both_days() {
        let mut it = Itinerary::new(HotelIdx::new(0));
        it.day_mut(0).push(a(3));
        it.day_mut(1).push(a(7));
        assert!(it.contains(a(3)));
        assert!(it.contains(a(7)));
        assert!(!it.contains(a(5)));
    }

    #[test]
    fn test_visited_order_is_day1_then_day2() {
        let mut it = Itinerary::new(HotelIdx::new(0));
        it.day_mut(0).push(a(2));
        it.day_mut(1).push(a(1));
        let order: Vec<_> = it.visited().collect();
        assert_eq!(order, vec![a(2), a(1)]);
    }
}
