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

use tour_plan_core::prelude::{Money, TimeDelta};

/// Travel mode of a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportMode {
    Walk,
    Subway,
    Bus,
    Car,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Walk,
        TransportMode::Subway,
        TransportMode::Bus,
        TransportMode::Car,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TransportMode::Walk => 0,
            TransportMode::Subway => 1,
            TransportMode::Bus => 2,
            TransportMode::Car => 3,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportMode::Walk => "walk",
            TransportMode::Subway => "subway",
            TransportMode::Bus => "bus",
            TransportMode::Car => "car",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "walk" => Some(TransportMode::Walk),
            "subway" => Some(TransportMode::Subway),
            "bus" => Some(TransportMode::Bus),
            "car" => Some(TransportMode::Car),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the travel graph: attractions first, hotels after them.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(usize);

impl NodeIdx {
    #[inline]
    pub const fn new(i: usize) -> Self {
        Self(i)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Duration and monetary cost of one leg under one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEntry {
    pub duration: TimeDelta,
    pub cost: Money,
}

impl TravelEntry {
    #[inline]
    pub const fn new(duration: TimeDelta, cost: Money) -> Self {
        Self { duration, cost }
    }

    /// A leg is usable under a mode only when its duration is a
    /// positive finite number of minutes.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.duration.is_positive() && self.cost.is_finite()
    }
}

/// Dense node-by-node travel table for a single mode.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    nodes: usize,
    entries: Vec<Option<TravelEntry>>,
}

impl TravelMatrix {
    pub fn new(nodes: usize) -> Self {
        Self {
            nodes,
            entries: vec![None; nodes * nodes],
        }
    }

    #[inline]
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    #[inline]
    fn slot(&self, from: NodeIdx, to: NodeIdx) -> usize {
        from.get() * self.nodes + to.get()
    }

    pub fn set(&mut self, from: NodeIdx, to: NodeIdx, entry: TravelEntry) {
        let slot = self.slot(from, to);
        self.entries[slot] = Some(entry);
    }

    /// The stored entry, feasible or not.
    #[inline]
    pub fn raw(&self, from: NodeIdx, to: NodeIdx) -> Option<TravelEntry> {
        self.entries[self.slot(from, to)]
    }

    /// The entry, filtered to feasible legs.
    #[inline]
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> Option<TravelEntry> {
        self.raw(from, to).filter(TravelEntry::is_feasible)
    }
}

/// One matrix per transport mode.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrixSet {
    matrices: [TravelMatrix; 4],
}

impl TravelMatrixSet {
    pub fn new(nodes: usize) -> Self {
        Self {
            matrices: [
                TravelMatrix::new(nodes),
                TravelMatrix::new(nodes),
                TravelMatrix::new(nodes),
                TravelMatrix::new(nodes),
            ],
        }
    }

    #[inline]
    pub fn matrix(&self, mode: TransportMode) -> &TravelMatrix {
        &self.matrices[mode.index()]
    }

    #[inline]
    pub fn matrix_mut(&mut self, mode: TransportMode) -> &mut TravelMatrix {
        &mut self.matrices[mode.index()]
    }

    #[inline]
    pub fn get(&self, from: NodeIdx, to: NodeIdx, mode: TransportMode) -> Option<TravelEntry> {
        self.matrix(mode).get(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn n(i: usize) -> NodeIdx {
        NodeIdx::new(i)
    }

    #[test]
    fn test_missing_entry_is_infeasible() {
        let m = TravelMatrix::new(3);
        assert!(m.get(n(0), n(1)).is_none());
    }

    #[test]
    fn test_zero_duration_entry_is_infeasible() {
        let mut m = TravelMatrix::new(2);
        m.set(n(0), n(1), TravelEntry::new(TimeDelta::new(0), 1.0));
        assert!(m.get(n(0), n(1)).is_none());
        assert!(m.raw(n(0), n(1)).is_some());
    }

    #[test]
    fn test_set_then_get() {
        let mut set = TravelMatrixSet::new(2);
        set.matrix_mut(TransportMode::Bus)
            .set(n(0), n(1), TravelEntry::new(TimeDelta::new(15), 4.5));
        let e = set.get(n(0), n(1), TransportMode::Bus).unwrap();
        assert_eq!(e.duration, TimeDelta::new(15));
        assert!(set.get(n(0), n(1), TransportMode::Car).is_none());
    }

    #[test]
    fn test_mode_parse_round_trip() {
        for mode in TransportMode::ALL {
            assert_eq!(TransportMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(TransportMode::parse("boat"), None);
    }
}
