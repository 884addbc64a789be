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

pub mod affine;
pub mod interval;

pub use affine::*;
pub use interval::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMarker;

impl MarkerName for TimeMarker {
    const NAME_POINT: &'static str = "TimePoint";
    const NAME_DELTA: &'static str = "TimeDelta";
}

/// A minute of the day. Schedules run on whole minutes.
pub type TimePoint = Point<i64, TimeMarker>;
/// A duration in minutes.
pub type TimeDelta = Delta<i64, TimeMarker>;
/// An opening window or day window, `[start, end)` in minutes of the day.
pub type TimeInterval = Interval<TimePoint>;

/// Monetary amounts (entrance fees, fares) in the catalog's currency.
pub type Money = f64;
/// Attraction quality rating, on the catalog's 0..=5 scale.
pub type Rating = f64;
