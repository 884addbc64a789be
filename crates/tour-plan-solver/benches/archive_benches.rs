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

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tour_plan_model::prelude::{HotelIdx, Itinerary, ObjectiveVector, Solution};
use tour_plan_solver::archive::Archive;
use tour_plan_solver::indicators::hypervolume;

fn staircase(n: usize) -> Vec<Solution> {
    (0..n)
        .map(|i| {
            Solution::new(
                Itinerary::new(HotelIdx::new(0)),
                ObjectiveVector::new(
                    i as u32 + 1,
                    1.5 * (i + 1) as f64,
                    200 + 60 * i as i64,
                    12.0 * (i + 1) as f64,
                ),
            )
        })
        .collect()
}

fn bench_archive_insert(c: &mut Criterion) {
    let candidates = staircase(120);
    c.bench_function("archive_insert_with_truncation", |b| {
        b.iter(|| {
            let mut archive = Archive::new(60);
            for s in &candidates {
                archive.try_insert(black_box(s.clone()));
            }
            black_box(archive.len())
        })
    });
}

fn bench_hypervolume_d4(c: &mut Criterion) {
    let points: Vec<[f64; 4]> = staircase(60)
        .iter()
        .map(|s| s.objectives().as_min_point())
        .collect();
    let reference = [0.0, 0.0, 5000.0, 1000.0];
    c.bench_function("hypervolume_exact_d4_60pts", |b| {
        b.iter(|| black_box(hypervolume(black_box(&points), black_box(reference))))
    });
}

criterion_group!(benches, bench_archive_insert, bench_hypervolume_d4);
criterion_main!(benches);
