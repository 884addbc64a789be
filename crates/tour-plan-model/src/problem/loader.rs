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

use crate::problem::{
    attraction::{Attraction, AttractionId},
    builder::ProblemBuilder,
    err::{DataError, LoaderError, ParseRowError},
    hotel::{Hotel, HotelId},
    matrix::{TransportMode, TravelEntry},
    prob::Problem,
};
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tour_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};

/// Reads the attraction and hotel catalogs plus one travel matrix file
/// per mode from comma-separated text.
///
/// Matrix entries that are absent stay infeasible, except for walking:
/// with the fallback enabled, missing walk pairs are derived from
/// straight-line distance at a configurable speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProblemLoader {
    walk_fallback: bool,
    walk_speed_kmh: f64,
}

impl Default for ProblemLoader {
    fn default() -> Self {
        Self {
            walk_fallback: true,
            walk_speed_kmh: 4.5,
        }
    }
}

struct CatalogRow {
    id: u32,
    lat: f64,
    lon: f64,
}

impl ProblemLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn walk_fallback(mut self, yes: bool) -> Self {
        self.walk_fallback = yes;
        self
    }

    #[inline]
    pub fn walk_speed_kmh(mut self, kmh: f64) -> Self {
        self.walk_speed_kmh = kmh;
        self
    }

    /// Loads a problem from `attractions`, `hotels` and a directory
    /// holding `walk.csv`, `subway.csv`, `bus.csv` and `car.csv`.
    pub fn from_paths(
        &self,
        attractions: &Path,
        hotels: &Path,
        matrix_dir: &Path,
    ) -> Result<Problem, LoaderError> {
        let mut builder = ProblemBuilder::new();
        let mut coords: Vec<CatalogRow> = Vec::new();

        self.read_attractions(
            BufReader::new(File::open(attractions)?),
            &attractions.to_string_lossy(),
            &mut builder,
            &mut coords,
        )?;
        self.read_hotels(
            BufReader::new(File::open(hotels)?),
            &hotels.to_string_lossy(),
            &mut builder,
            &mut coords,
        )?;

        let mut walk_pairs: BTreeSet<(u32, u32)> = BTreeSet::new();
        for mode in TransportMode::ALL {
            let path = matrix_dir.join(format!("{}.csv", mode));
            if !path.is_file() {
                if mode == TransportMode::Walk && self.walk_fallback {
                    continue;
                }
                return Err(DataError::MissingMatrix(mode).into());
            }
            self.read_matrix(
                BufReader::new(File::open(&path)?),
                &path.to_string_lossy(),
                mode,
                &mut builder,
                &mut walk_pairs,
            )?;
        }

        if self.walk_fallback {
            self.fill_walk_pairs(&coords, &walk_pairs, &mut builder);
        }

        builder.build().map_err(LoaderError::from)
    }

    fn read_attractions<R: BufRead>(
        &self,
        reader: R,
        file: &str,
        builder: &mut ProblemBuilder,
        coords: &mut Vec<CatalogRow>,
    ) -> Result<(), LoaderError> {
        for (line_no, line) in data_rows(reader)? {
            let fields = split_fields(&line, 9, file, line_no)?;
            let id = parse::<u32>(&fields[0], file, line_no, "id")?;
            let lat = parse::<f64>(&fields[2], file, line_no, "lat")?;
            let lon = parse::<f64>(&fields[3], file, line_no, "lon")?;
            let visit = parse::<i64>(&fields[4], file, line_no, "visit_minutes")?;
            let open = parse::<i64>(&fields[5], file, line_no, "open")?;
            let close = parse::<i64>(&fields[6], file, line_no, "close")?;
            let cost = parse::<f64>(&fields[7], file, line_no, "cost")?;
            let rating = parse::<f64>(&fields[8], file, line_no, "rating")?;

            let attraction = Attraction::new(
                AttractionId::new(id),
                fields[1].as_str(),
                lat,
                lon,
                TimeDelta::new(visit),
                TimeInterval::new(TimePoint::new(open), TimePoint::new(close)),
                cost,
                rating,
            )?;
            builder.add_attraction(attraction);
            coords.push(CatalogRow { id, lat, lon });
        }
        Ok(())
    }

    fn read_hotels<R: BufRead>(
        &self,
        reader: R,
        file: &str,
        builder: &mut ProblemBuilder,
        coords: &mut Vec<CatalogRow>,
    ) -> Result<(), LoaderError> {
        for (line_no, line) in data_rows(reader)? {
            let fields = split_fields(&line, 5, file, line_no)?;
            let id = parse::<u32>(&fields[0], file, line_no, "id")?;
            let lat = parse::<f64>(&fields[2], file, line_no, "lat")?;
            let lon = parse::<f64>(&fields[3], file, line_no, "lon")?;
            let price = parse::<f64>(&fields[4], file, line_no, "price")?;

            builder.add_hotel(Hotel::new(HotelId::new(id), fields[1].as_str(), lat, lon, price));
            coords.push(CatalogRow { id, lat, lon });
        }
        Ok(())
    }

    fn read_matrix<R: BufRead>(
        &self,
        reader: R,
        file: &str,
        mode: TransportMode,
        builder: &mut ProblemBuilder,
        walk_pairs: &mut BTreeSet<(u32, u32)>,
    ) -> Result<(), LoaderError> {
        for (line_no, line) in data_rows(reader)? {
            let fields = split_fields(&line, 4, file, line_no)?;
            let origin = parse::<u32>(&fields[0], file, line_no, "origin")?;
            let destination = parse::<u32>(&fields[1], file, line_no, "destination")?;
            let duration = parse::<i64>(&fields[2], file, line_no, "duration")?;
            let cost = parse::<f64>(&fields[3], file, line_no, "cost")?;

            builder.add_travel_raw(
                origin,
                destination,
                mode,
                TravelEntry::new(TimeDelta::new(duration), cost),
            );
            if mode == TransportMode::Walk {
                walk_pairs.insert((origin, destination));
            }
        }
        Ok(())
    }

    fn fill_walk_pairs(
        &self,
        coords: &[CatalogRow],
        present: &BTreeSet<(u32, u32)>,
        builder: &mut ProblemBuilder,
    ) {
        for from in coords {
            for to in coords {
                if from.id == to.id || present.contains(&(from.id, to.id)) {
                    continue;
                }
                let km = haversine_km(from.lat, from.lon, to.lat, to.lon);
                let minutes = ((km / self.walk_speed_kmh) * 60.0).ceil().max(1.0) as i64;
                builder.add_travel_raw(
                    from.id,
                    to.id,
                    TransportMode::Walk,
                    TravelEntry::new(TimeDelta::new(minutes), 0.0),
                );
            }
        }
    }
}

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

fn data_rows<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, LoaderError> {
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // header row: first field is not numeric
        if i == 0
            && trimmed
                .split(',')
                .next()
                .is_some_and(|f| f.trim().parse::<f64>().is_err())
        {
            continue;
        }
        rows.push((i + 1, trimmed.to_string()));
    }
    Ok(rows)
}

fn split_fields(
    line: &str,
    expected: usize,
    file: &str,
    line_no: usize,
) -> Result<Vec<String>, ParseRowError> {
    let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
    if fields.len() != expected {
        return Err(ParseRowError::new(
            file,
            line_no,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }
    Ok(fields)
}

fn parse<T: std::str::FromStr>(
    field: &str,
    file: &str,
    line_no: usize,
    name: &str,
) -> Result<T, ParseRowError> {
    field.parse::<T>().map_err(|_| {
        ParseRowError::new(
            file,
            line_no,
            format!("invalid value {:?} for {}", field, name),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTRACTIONS: &str = "\
id,name,lat,lon,visit_minutes,open,close,cost,rating
1,Christ the Redeemer,-22.9519,-43.2105,120,480,1140,62.0,4.8
2,Sugarloaf,-22.9493,-43.1546,150,540,1200,120.0,4.7
";

    const HOTELS: &str = "\
id,name,lat,lon,price
100,Copacabana Palace,-22.9668,-43.1797,450.0
";

    const BUS: &str = "\
origin,destination,duration,cost
1,2,35,4.05
2,1,40,4.05
100,1,25,4.05
1,100,28,4.05
";

    fn load() -> Problem {
        let loader = ProblemLoader::default();
        let mut builder = ProblemBuilder::new();
        let mut coords = Vec::new();
        let mut walk_pairs = BTreeSet::new();

        loader
            .read_attractions(ATTRACTIONS.as_bytes(), "attractions.csv", &mut builder, &mut coords)
            .unwrap();
        loader
            .read_hotels(HOTELS.as_bytes(), "hotels.csv", &mut builder, &mut coords)
            .unwrap();
        loader
            .read_matrix(BUS.as_bytes(), "bus.csv", TransportMode::Bus, &mut builder, &mut walk_pairs)
            .unwrap();
        loader.fill_walk_pairs(&coords, &walk_pairs, &mut builder);
        builder.build().unwrap()
    }

    #[test]
    fn test_catalogs_parse() {
        let p = load();
        assert_eq!(p.num_attractions(), 2);
        assert_eq!(p.num_hotels(), 1);
        assert_eq!(p.attractions()[0].name(), "Christ the Redeemer");
    }

    #[test]
    fn test_matrix_rows_resolve() {
        let p = load();
        let a = p.attraction_idx(AttractionId::new(1)).unwrap();
        let b = p.attraction_idx(AttractionId::new(2)).unwrap();
        let e = p
            .travel(
                p.attraction_node(a),
                p.attraction_node(b),
                TransportMode::Bus,
            )
            .unwrap();
        assert_eq!(e.duration, TimeDelta::new(35));
    }

    #[test]
    fn test_walk_fallback_covers_all_pairs() {
        let p = load();
        let a = p.attraction_node(p.attraction_idx(AttractionId::new(1)).unwrap());
        let h = p.hotel_node(p.hotel_idx(HotelId::new(100)).unwrap());
        let e = p.travel(h, a, TransportMode::Walk).unwrap();
        assert!(e.duration.is_positive());
        assert_eq!(e.cost, 0.0);
    }

    #[test]
    fn test_bad_row_reports_file_and_line() {
        let loader = ProblemLoader::default();
        let mut builder = ProblemBuilder::new();
        let mut coords = Vec::new();
        let err = loader
            .read_attractions(
                "id,name,lat,lon,visit_minutes,open,close,cost,rating\n9,X,0.0,oops,60,480,1200,0,4.0\n"
                    .as_bytes(),
                "attractions.csv",
                &mut builder,
                &mut coords,
            )
            .unwrap_err();
        match err {
            LoaderError::Parse(e) => {
                assert_eq!(e.file(), "attractions.csv");
                assert_eq!(e.line(), 2);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
