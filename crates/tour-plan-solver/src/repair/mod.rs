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

use crate::eval::{evaluate, Evaluation};
use fixedbitset::FixedBitSet;
use tour_plan_model::prelude::{Itinerary, Problem, Solution};

/// Truncation repair: makes a candidate feasible without reordering it.
///
/// First duplicate attractions are dropped, keeping the earliest
/// occurrence (day 1 before day 2). Then each day loses its last
/// attraction until it fits the day window and every opening-hours
/// constraint. Legs merged or created along the way are refitted to
/// the fastest feasible mode; surviving legs keep their modes.
///
/// Returns `None` when repair empties both days: such candidates are
/// skipped by the search.
pub fn repair(problem: &Problem, candidate: &Itinerary) -> Option<(Solution, Evaluation)> {
    let mut itinerary = candidate.clone();

    drop_duplicates(problem, &mut itinerary);

    for day in 0..2 {
        loop {
            match evaluate_day(problem, &itinerary, day) {
                Ok(()) => break,
                Err(()) => {
                    if itinerary.day_mut(day).pop().is_none() {
                        break;
                    }
                }
            }
        }
    }

    if itinerary.is_empty() {
        return None;
    }

    let evaluation = evaluate(problem, &itinerary).ok()?;
    Some((evaluation.clone().into_solution(itinerary), evaluation))
}

fn drop_duplicates(problem: &Problem, itinerary: &mut Itinerary) {
    let mut seen = FixedBitSet::with_capacity(problem.num_attractions());
    let hotel = itinerary.hotel();
    for day in 0..2 {
        let route = itinerary.day_mut(day);
        let mut pos = 0;
        let mut changed = false;
        while pos < route.len() {
            let a = route.attraction_at(pos);
            if seen.contains(a.get()) {
                route.remove_at(pos);
                changed = true;
            } else {
                seen.insert(a.get());
                pos += 1;
            }
        }
        if changed {
            route.refresh_modes(hotel, problem);
        }
    }
}

/// Feasibility of a single day, ignoring cross-day duplicates (those
/// are already gone by the time this runs).
fn evaluate_day(problem: &Problem, itinerary: &Itinerary, day: usize) -> Result<(), ()> {
    let mut probe = Itinerary::new(itinerary.hotel());
    *probe.day_mut(0) = itinerary.day(day).clone();
    evaluate(problem, &probe).map(|_| ()).map_err(|_| ())
}
