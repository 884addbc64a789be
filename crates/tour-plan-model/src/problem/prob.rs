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
    attraction::{Attraction, AttractionId, AttractionIdx},
    hotel::{Hotel, HotelId, HotelIdx},
    matrix::{NodeIdx, TransportMode, TravelEntry, TravelMatrixSet},
};
use std::collections::BTreeMap;
use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};

/// Tour days start at 08:00.
pub const DAY_START: TimePoint = TimePoint::new(480);
/// Tour days end at 20:00.
pub const DAY_END: TimePoint = TimePoint::new(1200);

/// Immutable problem data: catalogs plus the four travel matrices.
/// Built once through [`ProblemBuilder`](crate::problem::builder::ProblemBuilder)
/// and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Problem {
    attractions: Vec<Attraction>,
    hotels: Vec<Hotel>,
    matrices: TravelMatrixSet,
    attraction_index: BTreeMap<AttractionId, AttractionIdx>,
    hotel_index: BTreeMap<HotelId, HotelIdx>,
}

impl Problem {
    pub(crate) fn from_parts(
        attractions: Vec<Attraction>,
        hotels: Vec<Hotel>,
        matrices: TravelMatrixSet,
    ) -> Self {
        let attraction_index = attractions
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id(), AttractionIdx::new(i)))
            .collect();
        let hotel_index = hotels
            .iter()
            .enumerate()
            .map(|(i, h)| (h.id(), HotelIdx::new(i)))
            .collect();
        Self {
            attractions,
            hotels,
            matrices,
            attraction_index,
            hotel_index,
        }
    }

    #[inline]
    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    #[inline]
    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    #[inline]
    pub fn num_attractions(&self) -> usize {
        self.attractions.len()
    }

    #[inline]
    pub fn num_hotels(&self) -> usize {
        self.hotels.len()
    }

    #[inline]
    pub fn attraction(&self, idx: AttractionIdx) -> &Attraction {
        &self.attractions[idx.get()]
    }

    #[inline]
    pub fn hotel(&self, idx: HotelIdx) -> &Hotel {
        &self.hotels[idx.get()]
    }

    #[inline]
    pub fn attraction_idx(&self, id: AttractionId) -> Option<AttractionIdx> {
        self.attraction_index.get(&id).copied()
    }

    #[inline]
    pub fn hotel_idx(&self, id: HotelId) -> Option<HotelIdx> {
        self.hotel_index.get(&id).copied()
    }

    #[inline]
    pub fn attraction_indices(&self) -> impl Iterator<Item = AttractionIdx> {
        (0..self.attractions.len()).map(AttractionIdx::new)
    }

    #[inline]
    pub fn hotel_indices(&self) -> impl Iterator<Item = HotelIdx> {
        (0..self.hotels.len()).map(HotelIdx::new)
    }

    #[inline]
    pub fn day_window(&self) -> TimeInterval {
        TimeInterval::new(DAY_START, DAY_END)
    }

    /// Node of an attraction in the travel graph.
    #[inline]
    pub fn attraction_node(&self, idx: AttractionIdx) -> NodeIdx {
        NodeIdx::new(idx.get())
    }

    /// Node of a hotel in the travel graph.
    #[inline]
    pub fn hotel_node(&self, idx: HotelIdx) -> NodeIdx {
        NodeIdx::new(self.attractions.len() + idx.get())
    }

    /// Feasible travel entry between two nodes under a mode. Staying in
    /// place costs nothing, which covers the hotel-to-hotel leg of an
    /// empty day.
    pub fn travel(&self, from: NodeIdx, to: NodeIdx, mode: TransportMode) -> Option<TravelEntry> {
        if from == to {
            return Some(TravelEntry::new(TimeDelta::zero(), 0.0));
        }
        self.matrices.get(from, to, mode)
    }

    #[inline]
    pub fn is_mode_feasible(&self, from: NodeIdx, to: NodeIdx, mode: TransportMode) -> bool {
        self.travel(from, to, mode).is_some()
    }

    pub fn feasible_modes(
        &self,
        from: NodeIdx,
        to: NodeIdx,
    ) -> impl Iterator<Item = TransportMode> + '_ {
        TransportMode::ALL
            .into_iter()
            .filter(move |&mode| self.is_mode_feasible(from, to, mode))
    }

    /// The feasible mode with the shortest duration, ties broken by the
    /// fixed mode order (walk, subway, bus, car).
    pub fn fastest_mode(&self, from: NodeIdx, to: NodeIdx) -> Option<TransportMode> {
        TransportMode::ALL
            .into_iter()
            .filter_map(|mode| self.travel(from, to, mode).map(|e| (e.duration, mode)))
            .min_by_key(|&(duration, mode)| (duration, mode.index()))
            .map(|(_, mode)| mode)
    }

    #[inline]
    pub fn matrices(&self) -> &TravelMatrixSet {
        &self.matrices
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::builder::ProblemBuilder;
    use crate::problem::{
        attraction::{Attraction, AttractionId},
        hotel::{Hotel, HotelId},
        matrix::{TransportMode, TravelEntry},
    };
    use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};

    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }

    fn poi(id: u32, rating: f64) -> Attraction {
        Attraction::new(
            AttractionId::new(id),
            format!("poi-{}", id),
            0.0,
            0.0,
            TimeDelta::new(60),
            iv(480, 1200),
            10.0,
            rating,
        )
        .unwrap()
    }

    fn problem() -> crate::problem::prob::Problem {
        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1, 4.0));
        b.add_attraction(poi(2, 3.0));
        b.add_hotel(Hotel::new(HotelId::new(100), "hotel", 0.0, 0.0, 80.0));
        for mode in TransportMode::ALL {
            b.add_travel(
                AttractionId::new(1),
                AttractionId::new(2),
                mode,
                TravelEntry::new(TimeDelta::new(10), 2.0),
            )
            .unwrap();
        }
        b.add_walk_everywhere(TimeDelta::new(30));
        b.build().unwrap()
    }

    #[test]
    fn test_node_layout_attractions_before_hotels() {
        let p = problem();
        let a0 = p.attraction_node(p.attraction_idx(AttractionId::new(1)).unwrap());
        let h0 = p.hotel_node(p.hotel_idx(HotelId::new(100)).unwrap());
        assert_eq!(a0.get(), 0);
        assert_eq!(h0.get(), 2);
    }

    #[test]
    fn test_same_node_travel_is_free() {
        let p = problem();
        let h = p.hotel_node(p.hotel_idx(HotelId::new(100)).unwrap());
        let e = p.travel(h, h, TransportMode::Car).unwrap();
        assert_eq!(e.duration, TimeDelta::zero());
        assert_eq!(e.cost, 0.0);
    }

    #[test]
    fn test_fastest_mode_prefers_shortest_duration() {
        let p = problem();
        let a = p.attraction_node(p.attraction_idx(AttractionId::new(1)).unwrap());
        let b = p.attraction_node(p.attraction_idx(AttractionId::new(2)).unwrap());
        // all four modes take 10 minutes, walk wins the tie
        assert_eq!(p.fastest_mode(a, b), Some(TransportMode::Walk));
    }

    #[test]
    fn test_feasible_modes_respects_matrix() {
        let p = problem();
        let a = p.attraction_node(p.attraction_idx(AttractionId::new(2)).unwrap());
        let b = p.attraction_node(p.attraction_idx(AttractionId::new(1)).unwrap());
        // only the walk fallback covers the reverse direction
        let modes: Vec<_> = p.feasible_modes(a, b).collect();
        assert_eq!(modes, vec![TransportMode::Walk]);
    }
}
