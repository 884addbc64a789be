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

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Turns the caller's optional seed into the driver's single random
/// source. Every stochastic decision of a run draws from the one
/// generator, so a fixed seed reproduces the run.
#[derive(Clone, Copy, Debug)]
pub struct SeedSequencer {
    pub base: u64,
}

impl SeedSequencer {
    /// Default base for unseeded runs.
    const DEFAULT_BASE: u64 = 0x5EED_0F_2DA7;

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            base: seed.unwrap_or(Self::DEFAULT_BASE),
        }
    }

    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.base)
    }
}
