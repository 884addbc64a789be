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

//! Flat row records for the CSV serializers downstream of the core.
//!
//! The itinerary schema round-trips: writing an archive and reading it
//! back reconstructs the same objective vectors.

use crate::engine::IterationRecord;
use crate::eval::evaluate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use tour_plan_model::prelude::{ObjectiveVector, Problem, Solution};

/// One visit of one solution, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryRow {
    pub solution: usize,
    pub day: usize,
    pub order: usize,
    pub poi_id: u32,
    pub arrival: i64,
    pub departure: i64,
    pub mode: &'static str,
    pub leg_duration: i64,
    pub leg_cost: f64,
    pub rating: f64,
    pub f1: u32,
    pub f2: f64,
    pub f3: i64,
    pub f4: f64,
}

pub const ITINERARY_HEADER: &str =
    "solution,day,order,poi_id,arrival,departure,mode,leg_duration,leg_cost,rating,f1,f2,f3,f4";

/// Flattens one evaluated solution into per-visit rows.
pub fn itinerary_rows(
    problem: &Problem,
    solution: &Solution,
    solution_id: usize,
) -> Vec<ItineraryRow> {
    let objectives = solution.objectives();
    let evaluation = match evaluate(problem, solution.itinerary()) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut rows = Vec::new();
    for (day, schedule) in evaluation.days.iter().enumerate() {
        for (order, visit) in schedule.visits.iter().enumerate() {
            let attraction = problem.attraction(visit.attraction);
            rows.push(ItineraryRow {
                solution: solution_id,
                day: day + 1,
                order: order + 1,
                poi_id: *attraction.id().value(),
                arrival: visit.arrival.value(),
                departure: visit.departure.value(),
                mode: visit.mode.as_str(),
                leg_duration: visit.leg_duration.value(),
                leg_cost: visit.leg_cost,
                rating: attraction.rating(),
                f1: objectives.visits,
                f2: objectives.rating,
                f3: objectives.minutes,
                f4: objectives.cost,
            });
        }
    }
    rows
}

/// Rows for a whole archive or population dump, solutions numbered in
/// the order given.
pub fn population_rows<'a>(
    problem: &Problem,
    solutions: impl Iterator<Item = &'a Solution>,
) -> Vec<ItineraryRow> {
    let mut rows = Vec::new();
    for (id, solution) in solutions.enumerate() {
        rows.extend(itinerary_rows(problem, solution, id + 1));
    }
    rows
}

pub fn write_itinerary_csv<W: Write>(mut w: W, rows: &[ItineraryRow]) -> io::Result<()> {
    writeln!(w, "{}", ITINERARY_HEADER)?;
    for r in rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            r.solution,
            r.day,
            r.order,
            r.poi_id,
            r.arrival,
            r.departure,
            r.mode,
            r.leg_duration,
            r.leg_cost,
            r.rating,
            r.f1,
            r.f2,
            r.f3,
            r.f4
        )?;
    }
    Ok(())
}

/// Reads rows back; inverse of [`write_itinerary_csv`] up to float
/// formatting.
pub fn read_itinerary_csv<R: BufRead>(reader: R) -> io::Result<Vec<OwnedItineraryRow>> {
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if i == 0 || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 14 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("row {} has {} fields", i + 1, fields.len()),
            ));
        }
        let parse_err = |field: &str| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("row {}: bad value {:?}", i + 1, field),
            )
        };
        rows.push(OwnedItineraryRow {
            solution: fields[0].parse().map_err(|_| parse_err(fields[0]))?,
            day: fields[1].parse().map_err(|_| parse_err(fields[1]))?,
            order: fields[2].parse().map_err(|_| parse_err(fields[2]))?,
            poi_id: fields[3].parse().map_err(|_| parse_err(fields[3]))?,
            arrival: fields[4].parse().map_err(|_| parse_err(fields[4]))?,
            departure: fields[5].parse().map_err(|_| parse_err(fields[5]))?,
            mode: fields[6].to_string(),
            leg_duration: fields[7].parse().map_err(|_| parse_err(fields[7]))?,
            leg_cost: fields[8].parse().map_err(|_| parse_err(fields[8]))?,
            rating: fields[9].parse().map_err(|_| parse_err(fields[9]))?,
            f1: fields[10].parse().map_err(|_| parse_err(fields[10]))?,
            f2: fields[11].parse().map_err(|_| parse_err(fields[11]))?,
            f3: fields[12].parse().map_err(|_| parse_err(fields[12]))?,
            f4: fields[13].parse().map_err(|_| parse_err(fields[13]))?,
        });
    }
    Ok(rows)
}

/// A row as read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedItineraryRow {
    pub solution: usize,
    pub day: usize,
    pub order: usize,
    pub poi_id: u32,
    pub arrival: i64,
    pub departure: i64,
    pub mode: String,
    pub leg_duration: i64,
    pub leg_cost: f64,
    pub rating: f64,
    pub f1: u32,
    pub f2: f64,
    pub f3: i64,
    pub f4: f64,
}

/// Groups rows back into per-solution objective vectors.
pub fn objectives_by_solution(rows: &[OwnedItineraryRow]) -> BTreeMap<usize, ObjectiveVector> {
    let mut out = BTreeMap::new();
    for r in rows {
        out.entry(r.solution)
            .or_insert_with(|| ObjectiveVector::new(r.f1, r.f2, r.f3, r.f4));
    }
    out
}

pub const METRICS_HEADER: &str =
    "iteration,elapsed_ms,archive_size,hypervolume,spread,epsilon,f1,f2,f3,f4,k";

/// The per-iteration execution log.
pub fn write_metrics_csv<W: Write>(mut w: W, records: &[IterationRecord]) -> io::Result<()> {
    writeln!(w, "{}", METRICS_HEADER)?;
    for r in records {
        let epsilon = r
            .epsilon
            .map(|e| e.to_string())
            .unwrap_or_else(|| "NA".to_string());
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{},{},{}",
            r.iteration,
            r.elapsed_ms,
            r.archive_size,
            r.hypervolume,
            r.spread,
            epsilon,
            r.representative.visits,
            r.representative.rating,
            r.representative.minutes,
            r.representative.cost,
            r.k
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::max_attractions;
    use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};
    use tour_plan_model::problem::attraction::{Attraction, AttractionId};
    use tour_plan_model::problem::builder::ProblemBuilder;
    use tour_plan_model::problem::hotel::{Hotel, HotelId};

    fn problem() -> Problem {
        let mut b = ProblemBuilder::new();
        for id in 1..=3u32 {
            b.add_attraction(
                Attraction::new(
                    AttractionId::new(id),
                    format!("poi-{}", id),
                    0.0,
                    0.0,
                    TimeDelta::new(60),
                    TimeInterval::new(TimePoint::new(480), TimePoint::new(1200)),
                    7.5 * id as f64,
                    2.0 + 0.5 * id as f64,
                )
                .unwrap(),
            );
        }
        b.add_hotel(Hotel::new(HotelId::new(50), "h", 0.0, 0.0, 90.0));
        b.add_walk_everywhere(TimeDelta::new(20));
        b.build().unwrap()
    }

    #[test]
    fn test_rows_follow_visiting_order() {
        let p = problem();
        let s = max_attractions(&p).unwrap();
        let rows = itinerary_rows(&p, &s, 1);
        assert_eq!(rows.len(), s.objectives().visits as usize);
        for (i, r) in rows.iter().enumerate() {
            if i > 0 && rows[i - 1].day == r.day {
                assert_eq!(r.order, rows[i - 1].order + 1);
                assert!(r.arrival >= rows[i - 1].departure);
            }
        }
    }

    #[test]
    fn test_csv_round_trip_preserves_objectives() {
        let p = problem();
        let s = max_attractions(&p).unwrap();
        let rows = population_rows(&p, std::iter::once(&s));

        let mut buffer = Vec::new();
        write_itinerary_csv(&mut buffer, &rows).unwrap();
        let reread = read_itinerary_csv(buffer.as_slice()).unwrap();
        let objectives = objectives_by_solution(&reread);

        assert_eq!(objectives.len(), 1);
        assert_eq!(objectives[&1], s.objectives());
    }

    #[test]
    fn test_metrics_csv_marks_missing_epsilon() {
        let record = IterationRecord {
            iteration: 1,
            elapsed_ms: 12,
            archive_size: 5,
            hypervolume: 3.25,
            spread: 0.1,
            epsilon: None,
            representative: ObjectiveVector::new(2, 8.0, 240, 30.0),
            k: 3,
        };
        let mut buffer = Vec::new();
        write_metrics_csv(&mut buffer, &[record]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains(",NA,"));
        assert!(text.starts_with(METRICS_HEADER));
    }
}
