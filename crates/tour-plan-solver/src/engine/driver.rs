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

//! The MOVNS outer loop.
//!
//! Shake with escalating strength, descend, offer the results to the
//! elitist archive, and let the quality monitor steer diversification
//! and early termination. The driver owns the only random source of a
//! run; everything else is borrowed read-only.

use crate::archive::Archive;
use crate::construct::seed_candidates;
use crate::engine::config::SolverConfig;
use crate::engine::err::SolverError;
use crate::engine::local_search::local_search;
use crate::engine::termination::Termination;
use crate::indicators::QualityMonitor;
use crate::neighborhood::{shake, Neighborhood, NEIGHBORHOOD_ORDER};
use crate::support::rng::SeedSequencer;
use tour_plan_model::prelude::{ObjectiveVector, Problem, Solution};

/// Why the outer loop stopped, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TimeBudget,
    IdleLimit,
    EpsilonConverged,
    IterationCap,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StopReason::TimeBudget => "time budget exhausted",
            StopReason::IdleLimit => "idle-loop limit reached",
            StopReason::EpsilonConverged => "epsilon indicator converged",
            StopReason::IterationCap => "iteration cap reached",
        };
        write!(f, "{}", s)
    }
}

/// One execution-log row per outer loop.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub elapsed_ms: u128,
    pub archive_size: usize,
    pub hypervolume: f64,
    pub spread: f64,
    pub epsilon: Option<f64>,
    /// Objectives of the last round-robin base of this loop.
    pub representative: ObjectiveVector,
    /// Shake strength reached by the last base.
    pub k: usize,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct SolveOutcome {
    pub archive: Archive,
    pub initial: Vec<Solution>,
    pub log: Vec<IterationRecord>,
    pub iterations: usize,
    pub stop: StopReason,
}

/// The multi-objective variable neighborhood search driver.
#[derive(Debug)]
pub struct MovnsDriver<'p> {
    problem: &'p Problem,
    config: SolverConfig,
}

impl<'p> MovnsDriver<'p> {
    pub fn new(problem: &'p Problem, config: SolverConfig) -> Self {
        Self { problem, config }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self) -> Result<SolveOutcome, SolverError> {
        self.config.validate()?;
        let cfg = &self.config;
        let mut rng = SeedSequencer::new(cfg.seed).rng();
        let termination = Termination::new(cfg.max_time, cfg.max_iterations);

        let seeds = seed_candidates(self.problem, cfg.initial_solutions, &mut rng);
        let mut archive = Archive::new(cfg.archive_max);
        for seed in &seeds {
            archive.try_insert(seed.clone());
        }
        if archive.is_empty() {
            return Err(SolverError::EmptyArchive);
        }
        tracing::info!(
            seeds = seeds.len(),
            archive = archive.len(),
            "seeded initial archive"
        );

        let mut monitor = QualityMonitor::new(
            cfg.snapshot_every,
            cfg.spread_threshold,
            cfg.spread_window,
            cfg.epsilon_threshold,
            cfg.epsilon_windows,
        );
        let mut last_hv = monitor.tick(&archive.min_points()).hypervolume;

        let mut log: Vec<IterationRecord> = Vec::new();
        let mut iteration = 0usize;
        let mut idle_loops = 0usize;
        let mut forced_shake: Option<Neighborhood> = None;
        let mut epsilon_pending = false;

        let stop = loop {
            // termination precedence: time > idle loops > epsilon > cap
            if termination.time_exceeded() {
                break StopReason::TimeBudget;
            }
            if idle_loops >= cfg.idle_limit {
                break StopReason::IdleLimit;
            }
            if epsilon_pending {
                break StopReason::EpsilonConverged;
            }
            if termination.iteration_cap_reached(iteration) {
                break StopReason::IterationCap;
            }
            iteration += 1;

            let mut skipped_empty = 0u32;
            let mut last_k = 1usize;
            let mut representative = archive.solutions()[0].objectives();

            for _ in 0..archive.len() {
                if termination.time_exceeded() {
                    break;
                }
                let Some(base) = archive.round_robin_next() else {
                    break;
                };
                representative = base.objectives();

                let mut k = 1usize;
                while k <= cfg.k_max {
                    if termination.time_exceeded() {
                        break;
                    }
                    let neighborhood = forced_shake
                        .take()
                        .unwrap_or_else(|| NEIGHBORHOOD_ORDER[(k - 1).min(NEIGHBORHOOD_ORDER.len() - 1)]);

                    let Some((shaken, _)) = shake(self.problem, base.itinerary(), neighborhood, k, &mut rng)
                    else {
                        skipped_empty += 1;
                        k += 1;
                        continue;
                    };

                    let improved = local_search(
                        self.problem,
                        cfg.local_search_mode,
                        shaken,
                        &termination,
                        &mut rng,
                    );
                    let mut accepted = false;
                    for candidate in improved {
                        if archive.try_insert(candidate) {
                            accepted = true;
                        }
                    }
                    if accepted {
                        k = 1;
                    } else {
                        k += 1;
                    }
                    last_k = k;
                }
            }

            let report = monitor.tick(&archive.min_points());
            if report.hypervolume > last_hv + cfg.hv_tolerance {
                idle_loops = 0;
                last_hv = report.hypervolume;
            } else {
                idle_loops += 1;
            }
            if report.spread_stuck {
                tracing::debug!(iteration, "spread stuck, forcing a 2-opt shake");
                forced_shake = Some(Neighborhood::ReverseSegment);
            }
            if report.epsilon_converged {
                epsilon_pending = true;
            }

            tracing::debug!(
                iteration,
                archive = archive.len(),
                hv = report.hypervolume,
                spread = report.spread,
                skipped_empty,
                "outer loop finished"
            );
            if let Some(igd) = report.igd {
                tracing::debug!(iteration, igd, "igd against reference front");
            }

            log.push(IterationRecord {
                iteration,
                elapsed_ms: termination.elapsed().as_millis(),
                archive_size: archive.len(),
                hypervolume: report.hypervolume,
                spread: report.spread,
                epsilon: report.epsilon,
                representative,
                k: last_k,
            });
        };

        tracing::info!(iterations = iteration, archive = archive.len(), %stop, "search finished");
        Ok(SolveOutcome {
            archive,
            initial: seeds,
            log,
            iterations: iteration,
            stop,
        })
    }
}
