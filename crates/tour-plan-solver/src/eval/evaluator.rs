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

use crate::eval::err::EvalError;
use fixedbitset::FixedBitSet;
use tour_plan_core::prelude::{Money, TimeDelta, TimePoint};
use tour_plan_model::prelude::{
    AttractionIdx, Itinerary, ObjectiveVector, Problem, Solution, TransportMode, DAY_END,
    DAY_START,
};

/// One scheduled stop: when the tourist arrives (after any wait at the
/// door), when they leave, and the leg that brought them there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledVisit {
    pub attraction: AttractionIdx,
    pub arrival: TimePoint,
    pub departure: TimePoint,
    pub mode: TransportMode,
    pub leg_duration: TimeDelta,
    pub leg_cost: Money,
}

/// The timed plan of a single day, including the leg back to the hotel.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub visits: Vec<ScheduledVisit>,
    pub return_mode: TransportMode,
    pub return_duration: TimeDelta,
    pub return_cost: Money,
    pub end_of_day: TimePoint,
}

/// Result of evaluating a feasible itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub objectives: ObjectiveVector,
    pub days: [DaySchedule; 2],
}

impl Evaluation {
    /// Pairs the evaluated objectives with the itinerary they belong to.
    pub fn into_solution(self, itinerary: Itinerary) -> Solution {
        Solution::new(itinerary, self.objectives)
    }
}

/// Computes the objective vector and the timed schedule of both days.
///
/// Pure: neither the problem nor the itinerary is touched. Stops at the
/// first violation: an infeasible leg mode, a repeated attraction, a
/// visit that cannot fit its opening hours, or a day running past the
/// day window.
pub fn evaluate(problem: &Problem, itinerary: &Itinerary) -> Result<Evaluation, EvalError> {
    let mut seen = FixedBitSet::with_capacity(problem.num_attractions());
    let mut visits_total: u32 = 0;
    let mut rating_total: f64 = 0.0;
    let mut minutes_total: i64 = 0;
    let mut cost_total: Money = 0.0;
    let mut days: Vec<DaySchedule> = Vec::with_capacity(2);

    for (day, route) in itinerary.days().iter().enumerate() {
        let mut clock = DAY_START;
        let mut visits = Vec::with_capacity(route.len());

        for pos in 0..route.len() {
            let mode = route.mode_of_leg(pos);
            let (from, to) = route.leg_endpoints(pos, itinerary.hotel(), problem);
            let entry = problem
                .travel(from, to, mode)
                .ok_or(EvalError::InvalidMode { day, leg: pos, mode })?;

            let attraction_idx = route.attraction_at(pos);
            if seen.contains(attraction_idx.get()) {
                return Err(EvalError::DuplicatePoi {
                    attraction: attraction_idx,
                });
            }
            seen.insert(attraction_idx.get());

            let attraction = problem.attraction(attraction_idx);
            clock += entry.duration;
            // waiting for the doors to open counts towards F3
            let arrival = clock.max(attraction.opening().start());
            let departure = arrival + attraction.visit();
            if departure > attraction.opening().end() {
                return Err(EvalError::InfeasibleOpening {
                    day,
                    attraction: attraction_idx,
                });
            }
            clock = departure;

            visits_total += 1;
            rating_total += attraction.rating();
            cost_total += attraction.entry_cost() + entry.cost;
            visits.push(ScheduledVisit {
                attraction: attraction_idx,
                arrival,
                departure,
                mode,
                leg_duration: entry.duration,
                leg_cost: entry.cost,
            });
        }

        let return_leg = route.len();
        let return_mode = route.mode_of_leg(return_leg);
        let (from, to) = route.leg_endpoints(return_leg, itinerary.hotel(), problem);
        let entry = problem.travel(from, to, return_mode).ok_or(EvalError::InvalidMode {
            day,
            leg: return_leg,
            mode: return_mode,
        })?;
        clock += entry.duration;
        cost_total += entry.cost;
        if clock > DAY_END {
            return Err(EvalError::InfeasibleTime { day });
        }

        minutes_total += (clock - DAY_START).value();
        days.push(DaySchedule {
            visits,
            return_mode,
            return_duration: entry.duration,
            return_cost: entry.cost,
            end_of_day: clock,
        });
    }

    let day2 = days.pop().expect("two day schedules");
    let day1 = days.pop().expect("two day schedules");
    Ok(Evaluation {
        objectives: ObjectiveVector::new(visits_total, rating_total, minutes_total, cost_total),
        days: [day1, day2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::err::EvalError;
    use tour_plan_model::prelude::*;
    use tour_plan_model::problem::builder::ProblemBuilder;
    use tour_plan_model::problem::attraction::{Attraction, AttractionId};
    use tour_plan_model::problem::hotel::{Hotel, HotelId};

    fn iv(a: i64, b: i64) -> tour_plan_core::prelude::TimeInterval {
        tour_plan_core::prelude::TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }

    fn poi(id: u32, visit: i64, open: i64, close: i64, cost: f64, rating: f64) -> Attraction {
        Attraction::new(
            AttractionId::new(id),
            format!("poi-{}", id),
            0.0,
            0.0,
            TimeDelta::new(visit),
            iv(open, close),
            cost,
            rating,
        )
        .unwrap()
    }

    /// Two attractions, one hotel, every pair 30 walking minutes apart.
    fn problem() -> Problem {
        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1, 60, 480, 1200, 10.0, 4.0));
        b.add_attraction(poi(2, 90, 600, 1200, 20.0, 5.0));
        b.add_hotel(Hotel::new(HotelId::new(10), "h", 0.0, 0.0, 100.0));
        b.add_walk_everywhere(TimeDelta::new(30));
        b.build().unwrap()
    }

    fn idx(p: &Problem, id: u32) -> AttractionIdx {
        p.attraction_idx(AttractionId::new(id)).unwrap()
    }

    fn itinerary(p: &Problem, day1: &[u32], day2: &[u32]) -> Itinerary {
        let mut it = Itinerary::new(p.hotel_idx(HotelId::new(10)).unwrap());
        for &id in day1 {
            it.day_mut(0).push(idx(p, id));
        }
        for &id in day2 {
            it.day_mut(1).push(idx(p, id));
        }
        it
    }

    #[test]
    fn test_empty_itinerary_evaluates_to_zero() {
        let p = problem();
        let ev = evaluate(&p, &itinerary(&p, &[], &[])).unwrap();
        assert_eq!(ev.objectives, ObjectiveVector::new(0, 0.0, 0, 0.0));
        assert_eq!(ev.days[0].end_of_day, DAY_START);
    }

    #[test]
    fn test_schedule_walk_with_waiting() {
        let p = problem();
        let ev = evaluate(&p, &itinerary(&p, &[1, 2], &[])).unwrap();

        // 08:00 + 30 walk = 08:30, visit 60 -> 09:30
        let first = ev.days[0].visits[0];
        assert_eq!(first.arrival, TimePoint::new(510));
        assert_eq!(first.departure, TimePoint::new(570));

        // 09:30 + 30 walk = 10:00, wait for 10:00 opening (no wait), visit 90 -> 11:30
        let second = ev.days[0].visits[1];
        assert_eq!(second.arrival, TimePoint::new(600));
        assert_eq!(second.departure, TimePoint::new(690));

        // return leg 30 -> day ends 12:00
        assert_eq!(ev.days[0].end_of_day, TimePoint::new(720));

        // F: 2 visits, 9.0 rating, 240 minutes, 30 entry + 0 walk fares
        assert_eq!(ev.objectives, ObjectiveVector::new(2, 9.0, 240, 30.0));
    }

    #[test]
    fn test_waiting_counts_into_total_minutes() {
        let p = problem();
        // go straight to the late opener: arrive 08:30, wait until 10:00
        let ev = evaluate(&p, &itinerary(&p, &[2], &[])).unwrap();
        assert_eq!(ev.days[0].visits[0].arrival, TimePoint::new(600));
        // 90 wait + 30 + 90 + 30 = 240 minutes on the clock
        assert_eq!(ev.objectives.minutes, 240);
    }

    #[test]
    fn test_opening_hours_violation() {
        let mut b = ProblemBuilder::new();
        b.add_attraction(poi(1, 60, 480, 510, 0.0, 3.0)); // closes 08:30
        b.add_hotel(Hotel::new(HotelId::new(10), "h", 0.0, 0.0, 100.0));
        b.add_walk_everywhere(TimeDelta::new(30));
        let p = b.build().unwrap();

        let err = evaluate(&p, &itinerary(&p, &[1], &[])).unwrap_err();
        assert_eq!(
            err,
            EvalError::InfeasibleOpening {
                day: 0,
                attraction: idx(&p, 1),
            }
        );
    }

    #[test]
    fn test_day_window_violation() {
        let mut b = ProblemBuilder::new();
        // fits its (generous) opening hours but not the day window
        b.add_attraction(poi(1, 700, 480, 1440, 0.0, 3.0));
        b.add_hotel(Hotel::new(HotelId::new(10), "h", 0.0, 0.0, 100.0));
        b.add_walk_everywhere(TimeDelta::new(30));
        let p = b.build().unwrap();

        let err = evaluate(&p, &itinerary(&p, &[1], &[])).unwrap_err();
        assert_eq!(err, EvalError::InfeasibleTime { day: 0 });
    }

    #[test]
    fn test_duplicate_across_days() {
        let p = problem();
        let err = evaluate(&p, &itinerary(&p, &[1], &[1])).unwrap_err();
        assert_eq!(
            err,
            EvalError::DuplicatePoi {
                attraction: idx(&p, 1),
            }
        );
    }

    #[test]
    fn test_memoized_objectives_match_recomputation() {
        let p = problem();
        let it = itinerary(&p, &[1], &[2]);
        let ev = evaluate(&p, &it).unwrap();
        let sol = ev.clone().into_solution(it.clone());
        assert_eq!(sol.objectives(), evaluate(&p, &it).unwrap().objectives);
    }
}
