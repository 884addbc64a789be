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

use num_traits::{CheckedAdd, CheckedSub, Zero};
use std::{
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// An absolute position on an affine axis (e.g. a minute of the day).
///
/// Points cannot be added to each other; only deltas move a point.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Point::new(T::zero())
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn checked_add(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    #[inline]
    pub fn checked_sub(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub<Output = T>,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self
    where
        T: Ord,
    {
        if self.0 >= other.0 { self } else { other }
    }

    #[inline]
    pub fn min(self, other: Self) -> Self
    where
        T: Ord,
    {
        if self.0 <= other.0 { self } else { other }
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T, U> Default for Point<T, U>
where
    T: Zero,
{
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T, U> Add<Delta<T, U>> for Point<T, U>
where
    T: CheckedAdd,
{
    type Output = Point<T, U>;

    #[inline]
    fn add(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_add(&rhs.0).expect("error in Point + Delta"))
    }
}

impl<T, U> AddAssign<Delta<T, U>> for Point<T, U>
where
    T: CheckedAdd,
{
    fn add_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_add(&rhs.0).expect("error in Point += Delta");
    }
}

impl<T, U> Sub<Delta<T, U>> for Point<T, U>
where
    T: CheckedSub<Output = T>,
{
    type Output = Point<T, U>;

    fn sub(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_sub(&rhs.0).expect("error in Point - Delta"))
    }
}

impl<T, U> Sub<Point<T, U>> for Point<T, U>
where
    T: CheckedSub<Output = T>,
{
    type Output = Delta<T, U>;

    fn sub(self, rhs: Point<T, U>) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("error in Point - Point"))
    }
}

/// A translation along an affine axis (e.g. a duration in minutes).
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Delta::new(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 > T::zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 < T::zero()
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T, U> Default for Delta<T, U>
where
    T: Zero,
{
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

impl<T, U> From<T> for Delta<T, U> {
    #[inline]
    fn from(v: T) -> Self {
        Delta::new(v)
    }
}

impl<T, U> Add for Delta<T, U>
where
    T: CheckedAdd,
{
    type Output = Delta<T, U>;

    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_add(&rhs.0).expect("error in Delta + Delta"))
    }
}

impl<T, U> AddAssign for Delta<T, U>
where
    T: CheckedAdd,
{
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.checked_add(&rhs.0).expect("error in Delta += Delta");
    }
}

impl<T, U> Sub for Delta<T, U>
where
    T: CheckedSub<Output = T>,
{
    type Output = Delta<T, U>;

    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("error in Delta - Delta"))
    }
}

impl<T, U> SubAssign for Delta<T, U>
where
    T: CheckedSub<Output = T>,
{
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.checked_sub(&rhs.0).expect("error in Delta -= Delta");
    }
}

impl<T, U> Neg for Delta<T, U>
where
    T: Neg<Output = T>,
{
    type Output = Delta<T, U>;

    fn neg(self) -> Self::Output {
        Delta::new(-self.0)
    }
}

impl<T, U> Zero for Delta<T, U>
where
    T: Zero + CheckedAdd,
{
    #[inline]
    fn zero() -> Self {
        Delta::new(T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<T, U> Sum for Delta<T, U>
where
    T: Zero + CheckedAdd,
{
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Delta::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    struct TestMarker;

    impl MarkerName for TestMarker {
        const NAME_POINT: &'static str = "TestPoint";
        const NAME_DELTA: &'static str = "TestDelta";
    }

    type P = Point<i64, TestMarker>;
    type D = Delta<i64, TestMarker>;

    #[test]
    fn test_point_plus_delta() {
        let p = P::new(480) + D::new(30);
        assert_eq!(p.value(), 510);
    }

    #[test]
    fn test_point_minus_point_is_delta() {
        let d = P::new(510) - P::new(480);
        assert_eq!(d, D::new(30));
    }

    #[test]
    fn test_delta_sum() {
        let total: D = [D::new(10), D::new(20), D::new(12)].into_iter().sum();
        assert_eq!(total.value(), 42);
    }

    #[test]
    fn test_checked_add_overflow() {
        assert!(P::new(i64::MAX).checked_add(D::new(1)).is_none());
    }

    #[test]
    fn test_display_uses_marker_names() {
        assert_eq!(format!("{}", P::new(5)), "TestPoint(5)");
        assert_eq!(format!("{}", D::new(7)), "TestDelta(7)");
    }
}
