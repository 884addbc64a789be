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

use crate::engine::err::ConfigurationError;
use std::time::Duration;

/// Which flavor of local search the driver runs after each shake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalSearchMode {
    /// Pareto local search: variable neighborhood descent against a
    /// local archive.
    #[default]
    Pareto,
    /// First-improvement descent on a randomly weighted scalarization.
    Weighted,
}

/// Driver configuration. Defaults follow the published experiment
/// setup; every knob is validated before the search starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Seed candidates to construct before the outer loop.
    pub initial_solutions: usize,
    /// Archive capacity.
    pub archive_max: usize,
    /// Highest shake neighborhood index.
    pub k_max: usize,
    /// Wall-clock budget.
    pub max_time: Duration,
    /// Outer-loop cap; `None` leaves it to the time budget.
    pub max_iterations: Option<usize>,
    /// Outer loops without hyper-volume growth before stopping.
    pub idle_limit: usize,
    /// Minimum hyper-volume improvement that counts as progress.
    pub hv_tolerance: f64,
    pub local_search_mode: LocalSearchMode,
    /// Fixing this reproduces a run.
    pub seed: Option<u64>,
    pub spread_threshold: f64,
    pub spread_window: u32,
    pub epsilon_threshold: f64,
    pub epsilon_windows: u32,
    /// Outer loops between archive snapshots of the quality monitor.
    pub snapshot_every: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_solutions: 20,
            archive_max: 60,
            k_max: 5,
            max_time: Duration::from_secs(120),
            max_iterations: None,
            idle_limit: 30,
            hv_tolerance: 0.0,
            local_search_mode: LocalSearchMode::Pareto,
            seed: None,
            spread_threshold: 0.35,
            spread_window: 50,
            epsilon_threshold: 0.05,
            epsilon_windows: 3,
            snapshot_every: 10,
        }
    }
}

impl SolverConfig {
    pub fn with_initial_solutions(mut self, n: usize) -> Self {
        self.initial_solutions = n;
        self
    }

    pub fn with_archive_max(mut self, n: usize) -> Self {
        self.archive_max = n;
        self
    }

    pub fn with_k_max(mut self, k: usize) -> Self {
        self.k_max = k;
        self
    }

    pub fn with_max_time(mut self, budget: Duration) -> Self {
        self.max_time = budget;
        self
    }

    pub fn with_max_iterations(mut self, cap: Option<usize>) -> Self {
        self.max_iterations = cap;
        self
    }

    pub fn with_idle_limit(mut self, n: usize) -> Self {
        self.idle_limit = n;
        self
    }

    pub fn with_hv_tolerance(mut self, tau: f64) -> Self {
        self.hv_tolerance = tau;
        self
    }

    pub fn with_local_search_mode(mut self, mode: LocalSearchMode) -> Self {
        self.local_search_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_snapshot_every(mut self, n: u32) -> Self {
        self.snapshot_every = n;
        self
    }

    /// Checks parameter ranges; runs before the driver starts.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.initial_solutions == 0 {
            return Err(ConfigurationError::new("initial_solutions must be positive"));
        }
        if self.archive_max == 0 {
            return Err(ConfigurationError::new("archive_max must be positive"));
        }
        if self.k_max == 0 {
            return Err(ConfigurationError::new("k_max must be positive"));
        }
        if self.max_time.is_zero() {
            return Err(ConfigurationError::new("max_time must be positive"));
        }
        if self.idle_limit == 0 {
            return Err(ConfigurationError::new("idle_limit must be positive"));
        }
        if self.hv_tolerance < 0.0 {
            return Err(ConfigurationError::new("hv_tolerance must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.spread_threshold) {
            return Err(ConfigurationError::new("spread_threshold must lie in 0..=1"));
        }
        if self.spread_window == 0 {
            return Err(ConfigurationError::new("spread_window must be positive"));
        }
        if self.epsilon_threshold <= 0.0 {
            return Err(ConfigurationError::new("epsilon_threshold must be positive"));
        }
        if self.epsilon_windows == 0 {
            return Err(ConfigurationError::new("epsilon_windows must be positive"));
        }
        if self.snapshot_every == 0 {
            return Err(ConfigurationError::new("snapshot_every must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_archive_rejected() {
        let cfg = SolverConfig::default().with_archive_max(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let cfg = SolverConfig::default().with_hv_tolerance(-0.5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let cfg = SolverConfig::default()
            .with_initial_solutions(4)
            .with_archive_max(30)
            .with_seed(99);
        assert_eq!(cfg.initial_solutions, 4);
        assert_eq!(cfg.archive_max, 30);
        assert_eq!(cfg.seed, Some(99));
        assert!(cfg.validate().is_ok());
    }
}
