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

use crate::engine::config::LocalSearchMode;
use crate::engine::termination::Termination;
use crate::neighborhood::NEIGHBORHOOD_ORDER;
use crate::repair::repair;
use rand::Rng;
use tour_plan_model::prelude::{Problem, Solution};

/// Runs the configured local search and returns the candidates worth
/// offering to the global archive: the whole local front in Pareto
/// mode, a single descended solution in weighted mode.
pub fn local_search<R: Rng>(
    problem: &Problem,
    mode: LocalSearchMode,
    start: Solution,
    termination: &Termination,
    rng: &mut R,
) -> Vec<Solution> {
    match mode {
        LocalSearchMode::Pareto => pareto_local_search(problem, start, termination),
        LocalSearchMode::Weighted => {
            vec![weighted_descent(problem, start, termination, rng)]
        }
    }
}

/// Variable neighborhood descent against a local archive.
///
/// Each neighborhood is enumerated exhaustively; repaired neighbors
/// that are non-dominated with respect to the local archive are
/// accepted. Any acceptance restarts the descent at the first
/// neighborhood from the newest accepted solution; the search ends
/// when the last neighborhood accepts nothing.
pub fn pareto_local_search(
    problem: &Problem,
    start: Solution,
    termination: &Termination,
) -> Vec<Solution> {
    let mut local: Vec<Solution> = vec![start.clone()];
    let mut current = start;
    let mut nb_idx = 0;

    while nb_idx < NEIGHBORHOOD_ORDER.len() {
        if termination.time_exceeded() {
            break;
        }
        let neighborhood = NEIGHBORHOOD_ORDER[nb_idx];
        let mut newest: Option<Solution> = None;
        for mv in neighborhood.moves(problem, current.itinerary()) {
            let candidate = mv.apply(problem, current.itinerary());
            if let Some((sol, _)) = repair(problem, &candidate) {
                if insert_nondominated(&mut local, sol.clone()) {
                    newest = Some(sol);
                }
            }
        }
        match newest {
            Some(sol) => {
                current = sol;
                nb_idx = 0;
            }
            None => nb_idx += 1,
        }
    }
    local
}

/// First-improvement descent on a random scalarization of the four
/// objectives. The weight vector is drawn from the unit simplex using
/// the driver's generator, keeping runs reproducible.
pub fn weighted_descent<R: Rng>(
    problem: &Problem,
    start: Solution,
    termination: &Termination,
    rng: &mut R,
) -> Solution {
    let weights = sample_simplex(rng);
    let mut current = start;
    let mut current_value = current.objectives().weighted_value(weights);

    'descent: loop {
        if termination.time_exceeded() {
            break;
        }
        for neighborhood in NEIGHBORHOOD_ORDER {
            for mv in neighborhood.moves(problem, current.itinerary()) {
                let candidate = mv.apply(problem, current.itinerary());
                let Some((sol, _)) = repair(problem, &candidate) else {
                    continue;
                };
                let value = sol.objectives().weighted_value(weights);
                if value < current_value {
                    current = sol;
                    current_value = value;
                    continue 'descent;
                }
            }
        }
        break;
    }
    current
}

fn sample_simplex<R: Rng>(rng: &mut R) -> [f64; 4] {
    let mut w = [0.0f64; 4];
    let mut total = 0.0;
    for v in &mut w {
        *v = rng.gen_range(f64::EPSILON..1.0);
        total += *v;
    }
    for v in &mut w {
        *v /= total;
    }
    w
}

/// Keeps `set` mutually non-dominated. Returns `true` iff the
/// candidate entered the set.
fn insert_nondominated(set: &mut Vec<Solution>, candidate: Solution) -> bool {
    if set
        .iter()
        .any(|s| s.dominates(&candidate) || s == &candidate)
    {
        return false;
    }
    set.retain(|s| !candidate.dominates(s));
    set.push(candidate);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::max_attractions;
    use crate::eval::evaluate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;
    use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};
    use tour_plan_model::prelude::*;
    use tour_plan_model::problem::attraction::{Attraction, AttractionId};
    use tour_plan_model::problem::builder::ProblemBuilder;
    use tour_plan_model::problem::hotel::{Hotel, HotelId};

    fn problem() -> Problem {
        let mut b = ProblemBuilder::new();
        for id in 1..=4u32 {
            b.add_attraction(
                Attraction::new(
                    AttractionId::new(id),
                    format!("poi-{}", id),
                    0.0,
                    0.0,
                    TimeDelta::new(60),
                    TimeInterval::new(TimePoint::new(480), TimePoint::new(1200)),
                    5.0 * id as f64,
                    1.0 + id as f64,
                )
                .unwrap(),
            );
        }
        b.add_hotel(Hotel::new(HotelId::new(100), "h", 0.0, 0.0, 80.0));
        b.add_walk_everywhere(TimeDelta::new(15));
        b.build().unwrap()
    }

    fn budget() -> Termination {
        Termination::new(Duration::from_secs(60), None)
    }

    #[test]
    fn test_pareto_front_is_mutually_nondominated() {
        let p = problem();
        let start = max_attractions(&p).unwrap();
        let front = pareto_local_search(&p, start, &budget());
        assert!(!front.is_empty());
        for a in &front {
            assert!(evaluate(&p, a.itinerary()).is_ok());
            for b in &front {
                if a != b {
                    assert!(!a.dominates(b));
                }
            }
        }
    }

    #[test]
    fn test_weighted_descent_never_worsens_the_scalarization() {
        let p = problem();
        let start = max_attractions(&p).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // the descended solution must not be dominated by its start
        let out = weighted_descent(&p, start.clone(), &budget(), &mut rng);
        assert!(!start.dominates(&out));
        assert!(evaluate(&p, out.itinerary()).is_ok());
    }

    #[test]
    fn test_insert_nondominated_purges_and_rejects() {
        let sol = |v: u32, r: f64, m: i64, c: f64| {
            Solution::new(
                Itinerary::new(HotelIdx::new(0)),
                ObjectiveVector::new(v, r, m, c),
            )
        };
        let mut set = Vec::new();
        assert!(insert_nondominated(&mut set, sol(1, 4.0, 400, 40.0)));
        // dominated candidate bounces
        assert!(!insert_nondominated(&mut set, sol(1, 3.0, 500, 50.0)));
        // dominating candidate replaces the member
        assert!(insert_nondominated(&mut set, sol(2, 5.0, 300, 30.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].objectives().visits, 2);
    }
}
