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
    attraction::{Attraction, AttractionId},
    err::DataError,
    hotel::{Hotel, HotelId},
    matrix::{NodeIdx, TransportMode, TravelEntry, TravelMatrixSet},
    prob::Problem,
};
use std::collections::BTreeSet;

/// Collects catalogs and travel rows, then validates and freezes them
/// into a [`Problem`].
///
/// Matrix rows reference endpoints by raw id; attraction ids take
/// precedence over hotel ids when both catalogs contain the same
/// number.
#[derive(Debug, Default)]
pub struct ProblemBuilder {
    attractions: Vec<Attraction>,
    hotels: Vec<Hotel>,
    travel_rows: Vec<(u32, u32, TransportMode, TravelEntry)>,
    uniform_walk: Option<TravelEntry>,
}

impl ProblemBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attraction(&mut self, attraction: Attraction) -> &mut Self {
        self.attractions.push(attraction);
        self
    }

    pub fn add_hotel(&mut self, hotel: Hotel) -> &mut Self {
        self.hotels.push(hotel);
        self
    }

    /// Records one directed travel row. Endpoints are resolved against
    /// the catalogs in [`build`](Self::build).
    pub fn add_travel(
        &mut self,
        origin: AttractionId,
        destination: AttractionId,
        mode: TransportMode,
        entry: TravelEntry,
    ) -> Result<&mut Self, DataError> {
        self.travel_rows
            .push((*origin.value(), *destination.value(), mode, entry));
        Ok(self)
    }

    /// Records one directed travel row between a hotel and an
    /// attraction or between hotels.
    pub fn add_travel_raw(
        &mut self,
        origin: u32,
        destination: u32,
        mode: TransportMode,
        entry: TravelEntry,
    ) -> &mut Self {
        self.travel_rows.push((origin, destination, mode, entry));
        self
    }

    /// Fills every missing walk pair with a uniform duration at zero
    /// cost. Walking is always available, even when slow.
    pub fn add_walk_everywhere(&mut self, duration: tour_plan_core::prelude::TimeDelta) -> &mut Self {
        self.uniform_walk = Some(TravelEntry::new(duration, 0.0));
        self
    }

    fn resolve(&self, id: u32) -> Option<NodeIdx> {
        if let Some(pos) = self
            .attractions
            .iter()
            .position(|a| *a.id().value() == id)
        {
            return Some(NodeIdx::new(pos));
        }
        self.hotels
            .iter()
            .position(|h| *h.id().value() == id)
            .map(|pos| NodeIdx::new(self.attractions.len() + pos))
    }

    pub fn build(self) -> Result<Problem, DataError> {
        if self.attractions.is_empty() {
            return Err(DataError::NoAttractions);
        }
        if self.hotels.is_empty() {
            return Err(DataError::NoHotels);
        }

        let mut seen_attractions: BTreeSet<AttractionId> = BTreeSet::new();
        for a in &self.attractions {
            if !seen_attractions.insert(a.id()) {
                return Err(DataError::DuplicateAttractionId(a.id()));
            }
        }
        let mut seen_hotels: BTreeSet<HotelId> = BTreeSet::new();
        for h in &self.hotels {
            if !seen_hotels.insert(h.id()) {
                return Err(DataError::DuplicateHotelId(h.id()));
            }
        }

        let nodes = self.attractions.len() + self.hotels.len();
        let mut matrices = TravelMatrixSet::new(nodes);

        for &(origin, destination, mode, entry) in &self.travel_rows {
            let from = self
                .resolve(origin)
                .ok_or(DataError::UnknownEndpoint {
                    origin,
                    destination,
                })?;
            let to = self
                .resolve(destination)
                .ok_or(DataError::UnknownEndpoint {
                    origin,
                    destination,
                })?;
            matrices.matrix_mut(mode).set(from, to, entry);
        }

        if let Some(walk) = self.uniform_walk {
            let m = matrices.matrix_mut(TransportMode::Walk);
            for from in 0..nodes {
                for to in 0..nodes {
                    if from != to && m.raw(NodeIdx::new(from), NodeIdx::new(to)).is_none() {
                        m.set(NodeIdx::new(from), NodeIdx::new(to), walk);
                    }
                }
            }
        }

        Ok(Problem::from_parts(self.attractions, self.hotels, matrices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};

    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }

    fn poi(id: u32) -> Attraction {
        Attraction::new(
            AttractionId::new(id),
            format!("poi-{}", id),
            0.0,
            0.0,
            TimeDelta::new(45),
            iv(480, 1200),
            5.0,
            4.0,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let b = ProblemBuilder::new();
        assert!(matches!(b.build(), Err(DataError::NoAttractions)));

        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1));
        assert!(matches!(b.build(), Err(DataError::NoHotels)));
    }

    #[test]
    fn test_duplicate_attraction_id_is_fatal() {
        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1));
        b.add_attraction(poi(1));
        b.add_hotel(Hotel::new(HotelId::new(10), "h", 0.0, 0.0, 50.0));
        assert!(matches!(
            b.build(),
            Err(DataError::DuplicateAttractionId(_))
        ));
    }

    #[test]
    fn test_unknown_matrix_endpoint_is_fatal() {
        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1));
        b.add_hotel(Hotel::new(HotelId::new(10), "h", 0.0, 0.0, 50.0));
        b.add_travel_raw(
            1,
            99,
            TransportMode::Bus,
            TravelEntry::new(TimeDelta::new(5), 1.0),
        );
        assert!(matches!(b.build(), Err(DataError::UnknownEndpoint { .. })));
    }

    #[test]
    fn test_walk_fill_skips_existing_entries() {
        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1));
        b.add_hotel(Hotel::new(HotelId::new(10), "h", 0.0, 0.0, 50.0));
        b.add_travel_raw(
            1,
            10,
            TransportMode::Walk,
            TravelEntry::new(TimeDelta::new(7), 0.0),
        );
        b.add_walk_everywhere(TimeDelta::new(99));
        let p = b.build().unwrap();

        let a = p.attraction_node(p.attraction_idx(AttractionId::new(1)).unwrap());
        let h = p.hotel_node(p.hotel_idx(HotelId::new(10)).unwrap());
        assert_eq!(
            p.travel(a, h, TransportMode::Walk).unwrap().duration,
            TimeDelta::new(7)
        );
        assert_eq!(
            p.travel(h, a, TransportMode::Walk).unwrap().duration,
            TimeDelta::new(99)
        );
    }
}
