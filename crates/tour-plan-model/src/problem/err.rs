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

use crate::problem::{attraction::AttractionId, hotel::HotelId, matrix::TransportMode};
use tour_plan_core::prelude::{Money, Rating};

/// Fatal defects in the input catalogs or travel matrices.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    NoAttractions,
    NoHotels,
    DuplicateAttractionId(AttractionId),
    DuplicateHotelId(HotelId),
    NonPositiveVisit(AttractionId),
    EmptyOpeningWindow(AttractionId),
    InvalidRating(AttractionId, Rating),
    NegativeCost(AttractionId, Money),
    MissingMatrix(TransportMode),
    UnknownEndpoint { origin: u32, destination: u32 },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NoAttractions => write!(f, "The attraction catalog is empty."),
            DataError::NoHotels => write!(f, "The hotel catalog is empty."),
            DataError::DuplicateAttractionId(id) => {
                write!(f, "Attraction id {} occurs more than once", id)
            }
            DataError::DuplicateHotelId(id) => write!(f, "Hotel id {} occurs more than once", id),
            DataError::NonPositiveVisit(id) => {
                write!(f, "Attraction {} has a non-positive visit duration", id)
            }
            DataError::EmptyOpeningWindow(id) => {
                write!(f, "Attraction {} has an empty opening window", id)
            }
            DataError::InvalidRating(id, r) => {
                write!(f, "Attraction {} has rating {} outside 0..=5", id, r)
            }
            DataError::NegativeCost(id, c) => {
                write!(f, "Attraction {} has negative entrance cost {}", id, c)
            }
            DataError::MissingMatrix(mode) => {
                write!(f, "No travel matrix was supplied for mode {}", mode)
            }
            DataError::UnknownEndpoint {
                origin,
                destination,
            } => write!(
                f,
                "Travel matrix row references unknown node pair ({}, {})",
                origin, destination
            ),
        }
    }
}

impl std::error::Error for DataError {}

/// A row of an input file that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRowError {
    file: String,
    line: usize,
    message: String,
}

impl ParseRowError {
    pub fn new(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

impl std::error::Error for ParseRowError {}

#[derive(Debug)]
pub enum LoaderError {
    Io(std::io::Error),
    Parse(ParseRowError),
    Data(DataError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Io(e) => write!(f, "{}", e),
            LoaderError::Parse(e) => write!(f, "{}", e),
            LoaderError::Data(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Io(e) => Some(e),
            LoaderError::Parse(e) => Some(e),
            LoaderError::Data(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err)
    }
}

impl From<ParseRowError> for LoaderError {
    fn from(err: ParseRowError) -> Self {
        LoaderError::Parse(err)
    }
}

impl From<DataError> for LoaderError {
    fn from(err: DataError) -> Self {
        LoaderError::Data(err)
    }
}
