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

use crate::common::{Identifier, IdentifierMarkerName};
use crate::problem::err::DataError;
use tour_plan_core::prelude::{Money, Rating, TimeDelta, TimeInterval};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttractionIdMarker;

impl IdentifierMarkerName for AttractionIdMarker {
    const NAME: &'static str = "AttractionId";
}

pub type AttractionId = Identifier<u32, AttractionIdMarker>;

/// Position of an attraction in the problem's dense catalog.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttractionIdx(usize);

impl AttractionIdx {
    #[inline]
    pub const fn new(i: usize) -> Self {
        Self(i)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A point of interest: where it is, how long a visit takes, when it is
/// open, what it costs and how well it is rated.
#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    id: AttractionId,
    name: String,
    lat: f64,
    lon: f64,
    visit: TimeDelta,
    opening: TimeInterval,
    entry_cost: Money,
    rating: Rating,
}

impl Attraction {
    pub fn new(
        id: AttractionId,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        visit: TimeDelta,
        opening: TimeInterval,
        entry_cost: Money,
        rating: Rating,
    ) -> Result<Self, DataError> {
        if !visit.is_positive() {
            return Err(DataError::NonPositiveVisit(id));
        }
        if opening.is_empty() {
            return Err(DataError::EmptyOpeningWindow(id));
        }
        if !(0.0..=5.0).contains(&rating) {
            return Err(DataError::InvalidRating(id, rating));
        }
        if entry_cost < 0.0 {
            return Err(DataError::NegativeCost(id, entry_cost));
        }
        Ok(Self {
            id,
            name: name.into(),
            lat,
            lon,
            visit,
            opening,
            entry_cost,
            rating,
        })
    }

    #[inline]
    pub fn id(&self) -> AttractionId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn visit(&self) -> TimeDelta {
        self.visit
    }

    #[inline]
    pub fn opening(&self) -> TimeInterval {
        self.opening
    }

    #[inline]
    pub fn entry_cost(&self) -> Money {
        self.entry_cost
    }

    #[inline]
    pub fn rating(&self) -> Rating {
        self.rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_plan_core::prelude::TimePoint;

    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }

    #[test]
    fn test_valid_attraction() {
        let a = Attraction::new(
            AttractionId::new(1),
            "Museum",
            -22.9,
            -43.2,
            TimeDelta::new(90),
            iv(540, 1080),
            25.0,
            4.5,
        );
        assert!(a.is_ok());
    }

    #[test]
    fn test_non_positive_visit_rejected() {
        let a = Attraction::new(
            AttractionId::new(2),
            "Kiosk",
            0.0,
            0.0,
            TimeDelta::new(0),
            iv(540, 1080),
            0.0,
            3.0,
        );
        assert!(matches!(a, Err(DataError::NonPositiveVisit(_))));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let a = Attraction::new(
            AttractionId::new(3),
            "Tower",
            0.0,
            0.0,
            TimeDelta::new(30),
            iv(540, 1080),
            0.0,
            5.5,
        );
        assert!(matches!(a, Err(DataError::InvalidRating(_, _))));
    }

    #[test]
    fn test_empty_opening_window_rejected() {
        let a = Attraction::new(
            AttractionId::new(4),
            "Gate",
            0.0,
            0.0,
            TimeDelta::new(30),
            iv(600, 600),
            0.0,
            3.0,
        );
        assert!(matches!(a, Err(DataError::EmptyOpeningWindow(_))));
    }
}
