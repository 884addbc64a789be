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

//! The seven neighborhood structures of the search.
//!
//! Each neighborhood produces [`Move`] descriptors through a uniform
//! contract: [`Neighborhood::sample_one`] draws a random move for
//! shaking, [`Neighborhood::moves`] enumerates the whole neighborhood
//! for local search. Applying a move yields a fresh candidate
//! itinerary; the caller evaluates and repairs it. Structural moves
//! refit every leg whose endpoints changed, so a candidate can violate
//! time windows but never carries an infeasible transport mode.

use crate::eval::Evaluation;
use crate::repair::repair;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use tour_plan_model::prelude::{
    AttractionIdx, HotelIdx, Itinerary, Problem, Solution, TransportMode,
};

/// The neighborhood structures, in their fixed exploration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    /// N1: exchange two positions within one day.
    SwapWithinDay,
    /// N2: move a visit to the other day.
    MoveBetweenDays,
    /// N3: insert an unvisited POI or drop a visited one.
    InsertRemove,
    /// N4: replace a visit by an unvisited POI.
    Substitute,
    /// N5: reverse a sub-sequence of one day.
    ReverseSegment,
    /// N6: move to a different hotel.
    ChangeHotel,
    /// N7: change the transport mode of one leg.
    ChangeMode,
}

pub const NEIGHBORHOOD_ORDER: [Neighborhood; 7] = [
    Neighborhood::SwapWithinDay,
    Neighborhood::MoveBetweenDays,
    Neighborhood::InsertRemove,
    Neighborhood::Substitute,
    Neighborhood::ReverseSegment,
    Neighborhood::ChangeHotel,
    Neighborhood::ChangeMode,
];

impl Neighborhood {
    pub const fn label(self) -> &'static str {
        match self {
            Neighborhood::SwapWithinDay => "swap-within-day",
            Neighborhood::MoveBetweenDays => "move-between-days",
            Neighborhood::InsertRemove => "insert-remove",
            Neighborhood::Substitute => "substitute",
            Neighborhood::ReverseSegment => "reverse-segment",
            Neighborhood::ChangeHotel => "change-hotel",
            Neighborhood::ChangeMode => "change-mode",
        }
    }
}

/// A single move, cheap to store and apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Swap { day: usize, i: usize, j: usize },
    Relocate { from_day: usize, from_pos: usize, to_pos: usize },
    Insert { day: usize, pos: usize, attraction: AttractionIdx },
    Remove { day: usize, pos: usize },
    Substitute { day: usize, pos: usize, attraction: AttractionIdx },
    Reverse { day: usize, i: usize, j: usize },
    SwapHotel { hotel: HotelIdx },
    SetMode { day: usize, leg: usize, mode: TransportMode },
}

impl Move {
    /// Applies the move to a copy of `base`. Legs whose endpoints
    /// changed keep their mode when it is still feasible and fall back
    /// to the fastest feasible mode otherwise; brand-new legs always
    /// take the fastest feasible mode.
    pub fn apply(&self, problem: &Problem, base: &Itinerary) -> Itinerary {
        let mut it = base.clone();
        let hotel = it.hotel();
        match *self {
            Move::Swap { day, i, j } => {
                it.day_mut(day).swap(i, j);
                it.day_mut(day).refresh_modes(hotel, problem);
            }
            Move::Relocate {
                from_day,
                from_pos,
                to_pos,
            } => {
                let attraction = it.day_mut(from_day).remove_at(from_pos);
                it.day_mut(from_day).refresh_modes(hotel, problem);
                let target = 1 - from_day;
                let route = it.day_mut(target);
                route.insert(to_pos, attraction);
                route.refit_leg(to_pos, hotel, problem);
                route.refit_leg(to_pos + 1, hotel, problem);
            }
            Move::Insert {
                day,
                pos,
                attraction,
            } => {
                let route = it.day_mut(day);
                route.insert(pos, attraction);
                route.refit_leg(pos, hotel, problem);
                route.refit_leg(pos + 1, hotel, problem);
            }
            Move::Remove { day, pos } => {
                it.day_mut(day).remove_at(pos);
                it.day_mut(day).refresh_modes(hotel, problem);
            }
            Move::Substitute {
                day,
                pos,
                attraction,
            } => {
                let route = it.day_mut(day);
                route.replace_at(pos, attraction);
                route.refit_leg(pos, hotel, problem);
                route.refit_leg(pos + 1, hotel, problem);
            }
            Move::Reverse { day, i, j } => {
                it.day_mut(day).reverse_segment(i, j);
                it.day_mut(day).refresh_modes(hotel, problem);
            }
            Move::SwapHotel { hotel: new_hotel } => {
                it.set_hotel(new_hotel);
                for day in 0..2 {
                    it.day_mut(day).refresh_modes(new_hotel, problem);
                }
            }
            Move::SetMode { day, leg, mode } => {
                it.day_mut(day).set_mode(leg, mode);
            }
        }
        it
    }
}

impl Neighborhood {
    /// Draws one random move, or `None` when the neighborhood is empty
    /// around the given itinerary.
    pub fn sample_one<R: Rng>(
        self,
        problem: &Problem,
        itinerary: &Itinerary,
        rng: &mut R,
    ) -> Option<Move> {
        match self {
            Neighborhood::SwapWithinDay => {
                let day = pick_day(itinerary, 2, rng)?;
                let len = itinerary.day(day).len();
                let i = rng.gen_range(0..len);
                let mut j = rng.gen_range(0..len - 1);
                if j >= i {
                    j += 1;
                }
                let (i, j) = (i.min(j), i.max(j));
                Some(Move::Swap { day, i, j })
            }
            Neighborhood::MoveBetweenDays => {
                let from_day = pick_day(itinerary, 1, rng)?;
                let from_pos = rng.gen_range(0..itinerary.day(from_day).len());
                let to_pos = rng.gen_range(0..=itinerary.day(1 - from_day).len());
                Some(Move::Relocate {
                    from_day,
                    from_pos,
                    to_pos,
                })
            }
            Neighborhood::InsertRemove => {
                let unvisited = unvisited(problem, itinerary);
                let want_insert = rng.gen_bool(0.5);
                if (want_insert && !unvisited.is_empty()) || itinerary.num_attractions() == 0 {
                    let attraction = *unvisited.choose(rng)?;
                    let day = rng.gen_range(0..2);
                    let pos = rng.gen_range(0..=itinerary.day(day).len());
                    Some(Move::Insert {
                        day,
                        pos,
                        attraction,
                    })
                } else {
                    let day = pick_day(itinerary, 1, rng)?;
                    let pos = rng.gen_range(0..itinerary.day(day).len());
                    Some(Move::Remove { day, pos })
                }
            }
            Neighborhood::Substitute => {
                let unvisited = unvisited(problem, itinerary);
                let attraction = *unvisited.choose(rng)?;
                let day = pick_day(itinerary, 1, rng)?;
                let pos = rng.gen_range(0..itinerary.day(day).len());
                Some(Move::Substitute {
                    day,
                    pos,
                    attraction,
                })
            }
            Neighborhood::ReverseSegment => {
                let day = pick_day(itinerary, 2, rng)?;
                let len = itinerary.day(day).len();
                let i = rng.gen_range(0..len - 1);
                let j = rng.gen_range(i + 1..len);
                Some(Move::Reverse { day, i, j })
            }
            Neighborhood::ChangeHotel => {
                let current = itinerary.hotel();
                let others: Vec<HotelIdx> = problem
                    .hotel_indices()
                    .filter(|&h| h != current)
                    .collect();
                let hotel = *others.choose(rng)?;
                Some(Move::SwapHotel { hotel })
            }
            Neighborhood::ChangeMode => {
                // legs that actually have an alternative
                let mut legs: Vec<(usize, usize)> = Vec::new();
                for day in 0..2 {
                    for leg in 0..itinerary.day(day).num_legs() {
                        if !alternative_modes(problem, itinerary, day, leg).is_empty() {
                            legs.push((day, leg));
                        }
                    }
                }
                let &(day, leg) = legs.choose(rng)?;
                let modes = alternative_modes(problem, itinerary, day, leg);
                let mode = *modes.choose(rng)?;
                Some(Move::SetMode { day, leg, mode })
            }
        }
    }

    /// Enumerates the full neighborhood around the given itinerary.
    pub fn moves(self, problem: &Problem, itinerary: &Itinerary) -> Vec<Move> {
        let mut out = Vec::new();
        match self {
            Neighborhood::SwapWithinDay => {
                for day in 0..2 {
                    let len = itinerary.day(day).len();
                    for i in 0..len {
                        for j in i + 1..len {
                            out.push(Move::Swap { day, i, j });
                        }
                    }
                }
            }
            Neighborhood::MoveBetweenDays => {
                for from_day in 0..2 {
                    for from_pos in 0..itinerary.day(from_day).len() {
                        for to_pos in 0..=itinerary.day(1 - from_day).len() {
                            out.push(Move::Relocate {
                                from_day,
                                from_pos,
                                to_pos,
                            });
                        }
                    }
                }
            }
            Neighborhood::InsertRemove => {
                for attraction in unvisited(problem, itinerary) {
                    for day in 0..2 {
                        for pos in 0..=itinerary.day(day).len() {
                            out.push(Move::Insert {
                                day,
                                pos,
                                attraction,
                            });
                        }
                    }
                }
                for day in 0..2 {
                    for pos in 0..itinerary.day(day).len() {
                        out.push(Move::Remove { day, pos });
                    }
                }
            }
            Neighborhood::Substitute => {
                for attraction in unvisited(problem, itinerary) {
                    for day in 0..2 {
                        for pos in 0..itinerary.day(day).len() {
                            out.push(Move::Substitute {
                                day,
                                pos,
                                attraction,
                            });
                        }
                    }
                }
            }
            Neighborhood::ReverseSegment => {
                for day in 0..2 {
                    let len = itinerary.day(day).len();
                    for i in 0..len {
                        for j in i + 1..len {
                            out.push(Move::Reverse { day, i, j });
                        }
                    }
                }
            }
            Neighborhood::ChangeHotel => {
                let current = itinerary.hotel();
                for hotel in problem.hotel_indices().filter(|&h| h != current) {
                    out.push(Move::SwapHotel { hotel });
                }
            }
            Neighborhood::ChangeMode => {
                for day in 0..2 {
                    for leg in 0..itinerary.day(day).num_legs() {
                        for mode in alternative_modes(problem, itinerary, day, leg) {
                            out.push(Move::SetMode { day, leg, mode });
                        }
                    }
                }
            }
        }
        out
    }
}

/// A random day with at least `min_len` attractions, trying the other
/// day when the first pick is too short.
fn pick_day<R: Rng>(itinerary: &Itinerary, min_len: usize, rng: &mut R) -> Option<usize> {
    let first = rng.gen_range(0..2);
    if itinerary.day(first).len() >= min_len {
        return Some(first);
    }
    let other = 1 - first;
    if itinerary.day(other).len() >= min_len {
        return Some(other);
    }
    None
}

fn unvisited(problem: &Problem, itinerary: &Itinerary) -> Vec<AttractionIdx> {
    problem
        .attraction_indices()
        .filter(|&a| !itinerary.contains(a))
        .collect()
}

/// Feasible modes for a leg other than the one it currently uses.
fn alternative_modes(
    problem: &Problem,
    itinerary: &Itinerary,
    day: usize,
    leg: usize,
) -> SmallVec<[TransportMode; 4]> {
    let route = itinerary.day(day);
    let (from, to) = route.leg_endpoints(leg, itinerary.hotel(), problem);
    if from == to {
        return SmallVec::new();
    }
    let current = route.mode_of_leg(leg);
    problem
        .feasible_modes(from, to)
        .filter(|&m| m != current)
        .collect()
}

/// Random perturbation of size `k`: applies `k` independently sampled
/// moves from one neighborhood, then repairs the result. `None` when
/// repair collapses the candidate to the empty itinerary.
pub fn shake<R: Rng>(
    problem: &Problem,
    base: &Itinerary,
    neighborhood: Neighborhood,
    k: usize,
    rng: &mut R,
) -> Option<(Solution, Evaluation)> {
    let mut current = base.clone();
    for _ in 0..k {
        if let Some(mv) = neighborhood.sample_one(problem, &current, rng) {
            current = mv.apply(problem, &current);
        }
    }
    repair(problem, &current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};
    use tour_plan_model::problem::attraction::{Attraction, AttractionId};
    use tour_plan_model::problem::builder::ProblemBuilder;
    use tour_plan_model::problem::hotel::{Hotel, HotelId};
    use tour_plan_model::problem::matrix::TravelEntry;

    fn iv(a: i64, b: i64) -> TimeInterval {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }

    fn poi(id: u32) -> Attraction {
        Attraction::new(
            AttractionId::new(id),
            format!("poi-{}", id),
            0.0,
            0.0,
            TimeDelta::new(45),
            iv(480, 1200),
            8.0,
            4.0,
        )
        .unwrap()
    }

    /// Five attractions, two hotels, walking plus a faster bus grid.
    fn problem() -> Problem {
        let mut b = ProblemBuilder::new();
        for id in 1..=5 {
            b.add_attraction(poi(id));
        }
        b.add_hotel(Hotel::new(HotelId::new(100), "h1", 0.0, 0.0, 80.0));
        b.add_hotel(Hotel::new(HotelId::new(101), "h2", 0.0, 0.0, 95.0));
        let ids: Vec<u32> = (1..=5).chain([100, 101]).collect();
        for &from in &ids {
            for &to in &ids {
                if from != to {
                    b.add_travel_raw(
                        from,
                        to,
                        TransportMode::Bus,
                        TravelEntry::new(TimeDelta::new(12), 3.0),
                    );
                }
            }
        }
        b.add_walk_everywhere(TimeDelta::new(25));
        b.build().unwrap()
    }

    fn base(p: &Problem) -> Itinerary {
        let mut it = Itinerary::new(p.hotel_idx(HotelId::new(100)).unwrap());
        for (day, ids) in [(0usize, [1u32, 2, 3].as_slice()), (1, [4].as_slice())] {
            for &id in ids {
                let a = p.attraction_idx(AttractionId::new(id)).unwrap();
                let pos = it.day(day).len();
                it.day_mut(day).insert(pos, a);
                let hotel = it.hotel();
                it.day_mut(day).refit_leg(pos, hotel, p);
                it.day_mut(day).refit_leg(pos + 1, hotel, p);
            }
        }
        it
    }

    #[test]
    fn test_swap_applied_twice_restores_itinerary() {
        let p = problem();
        let it = base(&p);
        let mv = Move::Swap { day: 0, i: 0, j: 2 };
        let once = mv.apply(&p, &it);
        let twice = mv.apply(&p, &once);
        assert_eq!(twice, it);
        assert_ne!(once, it);
    }

    #[test]
    fn test_reverse_applied_twice_restores_itinerary() {
        let p = problem();
        let it = base(&p);
        let mv = Move::Reverse { day: 0, i: 0, j: 2 };
        let twice = mv.apply(&p, &mv.apply(&p, &it));
        assert_eq!(twice, it);
    }

    #[test]
    fn test_every_sampled_move_survives_repair() {
        let p = problem();
        let it = base(&p);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for nb in NEIGHBORHOOD_ORDER {
            for _ in 0..20 {
                if let Some(mv) = nb.sample_one(&p, &it, &mut rng) {
                    let candidate = mv.apply(&p, &it);
                    if let Some((sol, _)) = repair(&p, &candidate) {
                        assert!(
                            evaluate(&p, sol.itinerary()).is_ok(),
                            "{:?} broke feasibility",
                            mv
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_enumerate_covers_all_swaps() {
        let p = problem();
        let it = base(&p);
        // day 0 holds three attractions -> 3 swaps, day 1 only one -> 0
        let moves = Neighborhood::SwapWithinDay.moves(&p, &it);
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_insert_remove_enumeration_counts() {
        let p = problem();
        let it = base(&p);
        // one unvisited poi, insertable at 4 + 2 positions; 4 removals
        let moves = Neighborhood::InsertRemove.moves(&p, &it);
        let inserts = moves
            .iter()
            .filter(|m| matches!(m, Move::Insert { .. }))
            .count();
        let removes = moves
            .iter()
            .filter(|m| matches!(m, Move::Remove { .. }))
            .count();
        assert_eq!(inserts, 6);
        assert_eq!(removes, 4);
    }

    #[test]
    fn test_change_hotel_keeps_modes_where_feasible() {
        let p = problem();
        let it = base(&p);
        let h2 = p.hotel_idx(HotelId::new(101)).unwrap();
        let moved = Move::SwapHotel { hotel: h2 }.apply(&p, &it);
        assert_eq!(moved.hotel(), h2);
        // bus runs everywhere, so the original leg modes survive
        assert_eq!(moved.day(0).modes(), it.day(0).modes());
        assert!(evaluate(&p, &moved).is_ok());
    }

    #[test]
    fn test_change_mode_only_offers_feasible_alternatives() {
        let p = problem();
        let it = base(&p);
        for mv in Neighborhood::ChangeMode.moves(&p, &it) {
            if let Move::SetMode { day, leg, mode } = mv {
                let candidate = mv.apply(&p, &it);
                assert!(evaluate(&p, &candidate).is_ok());
                let (from, to) =
                    it.day(day).leg_endpoints(leg, it.hotel(), &p);
                assert!(p.is_mode_feasible(from, to, mode));
            }
        }
    }

    #[test]
    fn test_shake_with_k3_changes_modes() {
        let p = problem();
        let it = base(&p);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (shaken, _) = shake(&p, &it, Neighborhood::ChangeMode, 3, &mut rng).unwrap();
        assert!(evaluate(&p, shaken.itinerary()).is_ok());
        // route structure untouched, only leg modes move
        assert_eq!(
            shaken.itinerary().day(0).attractions(),
            it.day(0).attractions()
        );
        let before = evaluate(&p, &it).unwrap().objectives;
        // bus fares differ from free walking, so three mode flips show in F4
        assert_ne!(shaken.objectives().cost, before.cost);
    }

    #[test]
    fn test_duplicate_injected_by_relocate_is_repaired() {
        let p = problem();
        let mut it = base(&p);
        // manually create a duplicate across days
        let dup = it.day(0).attraction_at(0);
        let pos = it.day(1).len();
        it.day_mut(1).insert(pos, dup);
        let hotel = it.hotel();
        it.day_mut(1).refit_leg(pos, hotel, &p);
        it.day_mut(1).refit_leg(pos + 1, hotel, &p);

        assert!(evaluate(&p, &it).is_err());
        let (sol, _) = repair(&p, &it).unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for a in sol.itinerary().visited() {
            assert!(seen.insert(a), "duplicate survived repair");
        }
    }
}
