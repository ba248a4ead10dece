//! Random number sources for maze generation
//!
//! Architects only need the [`RandomSource`] contract. Two implementations
//! are provided:
//! - [`SimpleLCG`], a Park-Miller generator (MINSTD) giving the same maze
//!   for the same seed on every platform;
//! - [`RngSource`] (feature `rand`), wrapping any `rand` generator.
//!
//! Constants:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

/// Uniformly distributed integers for architects
pub trait RandomSource {
    /// Random integer in `[low, high]` (inclusive)
    fn uniform_range(&mut self, low: usize, high: usize) -> usize;

    /// Random index in `[0, n)`; `n` must be non-zero
    fn uniform_index(&mut self, n: usize) -> usize;
}

/// Park-Miller Linear Congruential Generator
///
/// Generates a deterministic sequence of pseudo-random numbers from a seed.
/// Same seed always produces the same sequence.
#[derive(Clone, Debug)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    const A: u64 = 48271;
    const M: u64 = 2147483647; // 2^31 - 1

    /// Create a new LCG with the given seed
    ///
    /// Seed 0 is replaced with 1 to avoid a degenerate sequence; seeds are
    /// reduced modulo 2^31 - 1 so the state never reaches the modulus.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % Self::M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) {
        // u64 keeps the product from overflowing
        self.state = ((self.state as u64 * Self::A) % Self::M) as u32;
    }

    /// Next raw state value, in `[1, 2^31 - 1)`
    pub fn next_u32(&mut self) -> u32 {
        self.advance();
        self.state
    }

    /// Random integer in range [a, b] (inclusive)
    ///
    /// Pure integer arithmetic: `a + state * (b - a + 1) / M`
    pub fn randint(&mut self, a: usize, b: usize) -> usize {
        self.advance();

        let range = (b - a + 1) as u64;
        let scaled = (self.state as u64 * range) / Self::M;
        a + scaled as usize
    }

    /// Choose random index from a range [0, len)
    pub fn choice_index(&mut self, len: usize) -> usize {
        self.advance();

        let scaled = (self.state as u64 * len as u64) / Self::M;
        scaled as usize
    }
}

impl RandomSource for SimpleLCG {
    fn uniform_range(&mut self, low: usize, high: usize) -> usize {
        self.randint(low, high)
    }

    fn uniform_index(&mut self, n: usize) -> usize {
        self.choice_index(n)
    }
}

/// [`RandomSource`] backed by a `rand` generator
#[cfg(feature = "rand")]
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

#[cfg(feature = "rand")]
impl<R: rand::Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

#[cfg(feature = "rand")]
impl RngSource<rand::rngs::ThreadRng> {
    /// Source backed by the thread-local generator
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

#[cfg(feature = "rand")]
impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn uniform_range(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    fn uniform_index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}
