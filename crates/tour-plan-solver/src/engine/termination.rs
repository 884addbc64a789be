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

use std::time::{Duration, Instant};

/// Cooperative termination helper: the single-threaded engine polls it
/// at each outer loop and at each archive insertion. There is no
/// preemption; cancellation is implicit on budget exhaustion.
#[derive(Debug, Clone)]
pub struct Termination {
    started: Instant,
    budget: Duration,
    iteration_cap: Option<usize>,
}

impl Termination {
    pub fn new(budget: Duration, iteration_cap: Option<usize>) -> Self {
        Self {
            started: Instant::now(),
            budget,
            iteration_cap,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[inline]
    pub fn time_exceeded(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    #[inline]
    pub fn iteration_cap_reached(&self, iteration: usize) -> bool {
        self.iteration_cap.is_some_and(|cap| iteration >= cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_budget_not_exceeded() {
        let t = Termination::new(Duration::from_secs(3600), None);
        assert!(!t.time_exceeded());
    }

    #[test]
    fn test_zero_budget_exceeded_immediately() {
        let t = Termination::new(Duration::ZERO, None);
        assert!(t.time_exceeded());
    }

    #[test]
    fn test_iteration_cap() {
        let t = Termination::new(Duration::from_secs(3600), Some(5));
        assert!(!t.iteration_cap_reached(4));
        assert!(t.iteration_cap_reached(5));
        let uncapped = Termination::new(Duration::from_secs(3600), None);
        assert!(!uncapped.iteration_cap_reached(usize::MAX - 1));
    }
}
