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

use crate::indicators::{
    additive_epsilon, hypervolume, inverted_generational_distance, spread,
};
use std::collections::VecDeque;

/// How many archive snapshots the ring buffer keeps.
const SNAPSHOT_RING: usize = 3;

/// What the monitor observed on one outer loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorReport {
    pub hypervolume: f64,
    pub spread: f64,
    pub epsilon: Option<f64>,
    pub igd: Option<f64>,
    /// The front has clustered for a full spread window; the driver
    /// diversifies with a forced 2-opt shake.
    pub spread_stuck: bool,
    /// The ε-indicator stayed under its threshold for enough
    /// consecutive windows; the driver may stop early.
    pub epsilon_converged: bool,
}

/// Watches archive quality over a sliding window of snapshots and
/// raises the intensification/diversification signals of the search.
#[derive(Debug, Clone)]
pub struct QualityMonitor {
    snapshot_every: u32,
    spread_threshold: f64,
    spread_window: u32,
    epsilon_threshold: f64,
    epsilon_windows: u32,

    snapshots: VecDeque<Vec<[f64; 4]>>,
    external_reference: Option<Vec<[f64; 4]>>,
    /// Worst observed value per axis, across the union of everything
    /// the monitor has seen.
    worst: [f64; 4],
    seen_any: bool,
    ticks: u32,
    spread_run: u32,
    epsilon_run: u32,
    last_epsilon: Option<f64>,
}

impl QualityMonitor {
    pub fn new(
        snapshot_every: u32,
        spread_threshold: f64,
        spread_window: u32,
        epsilon_threshold: f64,
        epsilon_windows: u32,
    ) -> Self {
        Self {
            snapshot_every: snapshot_every.max(1),
            spread_threshold,
            spread_window,
            epsilon_threshold,
            epsilon_windows,
            snapshots: VecDeque::with_capacity(SNAPSHOT_RING),
            external_reference: None,
            worst: [f64::NEG_INFINITY; 4],
            seen_any: false,
            ticks: 0,
            spread_run: 0,
            epsilon_run: 0,
            last_epsilon: None,
        }
    }

    /// Supplies a known reference front for IGD; without one the union
    /// of the snapshot ring is used once it exists.
    pub fn with_reference_front(mut self, front: Vec<[f64; 4]>) -> Self {
        self.external_reference = Some(front);
        self
    }

    /// The reference point all hyper-volumes are measured against:
    /// worst observed value per axis, pushed outward by 10%.
    pub fn reference_point(&self) -> [f64; 4] {
        let mut r = [0.0; 4];
        for d in 0..4 {
            let w = self.worst[d];
            r[d] = w + 0.1 * w.abs();
        }
        r
    }

    /// Observes the archive at the end of one outer loop.
    pub fn tick(&mut self, archive_points: &[[f64; 4]]) -> MonitorReport {
        self.ticks += 1;
        for p in archive_points {
            for d in 0..4 {
                self.worst[d] = self.worst[d].max(p[d]);
            }
            self.seen_any = true;
        }

        let hv = if self.seen_any {
            hypervolume(archive_points, self.reference_point())
        } else {
            0.0
        };

        let delta = spread(archive_points);
        let mut spread_stuck = false;
        if delta > self.spread_threshold {
            self.spread_run += 1;
            if self.spread_run >= self.spread_window {
                spread_stuck = true;
                self.spread_run = 0;
            }
        } else {
            self.spread_run = 0;
        }

        let mut epsilon_converged = false;
        if self.ticks % self.snapshot_every == 0 {
            if let Some(previous) = self.snapshots.back() {
                self.last_epsilon = additive_epsilon(archive_points, previous);
                if let Some(eps) = self.last_epsilon {
                    if eps < self.epsilon_threshold {
                        self.epsilon_run += 1;
                    } else {
                        self.epsilon_run = 0;
                    }
                    if self.epsilon_run >= self.epsilon_windows {
                        epsilon_converged = true;
                    }
                }
            }
            if self.snapshots.len() == SNAPSHOT_RING {
                self.snapshots.pop_front();
            }
            self.snapshots.push_back(archive_points.to_vec());
        }

        let igd = self
            .reference_front()
            .and_then(|front| inverted_generational_distance(&front, archive_points));

        MonitorReport {
            hypervolume: hv,
            spread: delta,
            epsilon: self.last_epsilon,
            igd,
            spread_stuck,
            epsilon_converged,
        }
    }

    /// External front if supplied, else the union of the snapshot ring.
    /// `None` until either exists: IGD is then suppressed, not fatal.
    fn reference_front(&self) -> Option<Vec<[f64; 4]>> {
        if let Some(front) = &self.external_reference {
            return Some(front.clone());
        }
        if self.snapshots.is_empty() {
            return None;
        }
        Some(self.snapshots.iter().flatten().copied().collect())
    }
}
