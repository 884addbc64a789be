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

use tour_plan_model::prelude::{AttractionIdx, TransportMode};

/// Why a candidate itinerary failed evaluation. The evaluator stops at
/// the first violation it encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The day's schedule runs past the end of the day window.
    InfeasibleTime { day: usize },
    /// A visit cannot be completed inside the attraction's opening hours.
    InfeasibleOpening {
        day: usize,
        attraction: AttractionIdx,
    },
    /// The same attraction appears twice across the two days.
    DuplicatePoi { attraction: AttractionIdx },
    /// A leg's mode has no feasible matrix entry.
    InvalidMode {
        day: usize,
        leg: usize,
        mode: TransportMode,
    },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::InfeasibleTime { day } => {
                write!(f, "Day {} ends after the day window closes", day + 1)
            }
            EvalError::InfeasibleOpening { day, attraction } => write!(
                f,
                "Attraction at index {} on day {} cannot be visited inside its opening hours",
                attraction.get(),
                day + 1
            ),
            EvalError::DuplicatePoi { attraction } => write!(
                f,
                "Attraction at index {} is visited more than once",
                attraction.get()
            ),
            EvalError::InvalidMode { day, leg, mode } => write!(
                f,
                "Leg {} on day {} uses infeasible mode {}",
                leg,
                day + 1,
                mode
            ),
        }
    }
}

impl std::error::Error for EvalError {}
