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

use tour_plan_model::problem::err::DataError;

/// An invalid driver parameter, caught before the search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid configuration: {}", self.message)
    }
}

impl std::error::Error for ConfigurationError {}

/// Fatal outcomes of a solver run. Candidate-level infeasibility never
/// shows up here; it is repaired or skipped along the way.
#[derive(Debug)]
pub enum SolverError {
    Config(ConfigurationError),
    Data(DataError),
    /// Seeding produced no feasible solution at all.
    EmptyArchive,
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::Config(e) => write!(f, "{}", e),
            SolverError::Data(e) => write!(f, "{}", e),
            SolverError::EmptyArchive => {
                write!(f, "No feasible seed solution could be constructed")
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Config(e) => Some(e),
            SolverError::Data(e) => Some(e),
            SolverError::EmptyArchive => None,
        }
    }
}

impl From<ConfigurationError> for SolverError {
    fn from(err: ConfigurationError) -> Self {
        SolverError::Config(err)
    }
}

impl From<DataError> for SolverError {
    fn from(err: DataError) -> Self {
        SolverError::Data(err)
    }
}
