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
use tour_plan_core::prelude::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotelIdMarker;

impl IdentifierMarkerName for HotelIdMarker {
    const NAME: &'static str = "HotelId";
}

pub type HotelId = Identifier<u32, HotelIdMarker>;

/// Position of a hotel in the problem's dense catalog.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotelIdx(usize);

impl HotelIdx {
    #[inline]
    pub const fn new(i: usize) -> Self {
        Self(i)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Both tour days start and end here. The nightly price is carried for
/// reporting but does not enter the objective vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotel {
    id: HotelId,
    name: String,
    lat: f64,
    lon: f64,
    price: Money,
}

impl Hotel {
    pub fn new(id: HotelId, name: impl Into<String>, lat: f64, lon: f64, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            lat,
            lon,
            price,
        }
    }

    #[inline]
    pub fn id(&self) -> HotelId {
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
    pub fn price(&self) -> Money {
        self.price
    }
}
