//! Deterministic random number generator
//!
//! Mulberry32 with 32-bit wrapping arithmetic. Two sessions started from the
//! same seed and fed the same calls produce bit-identical streams, which is
//! what makes seed codes shareable between players and leaderboards
//! comparable.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Mulberry32 increment
const GOLDEN_GAMMA: u32 = 0x6D2B79F5;

/// Divisor mapping a u32 onto [0, 1)
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Seed codes are shown with at least this many digits
const SEED_CODE_WIDTH: usize = 6;

/// Upper bound (exclusive) for freshly generated seeds, keeps codes at six digits
const RANDOM_SEED_LIMIT: u32 = 1_000_000;

/// A deterministic random number generator
///
/// Never use `rand` or other non-deterministic sources inside game rules;
/// every roll goes through the session's `GameRng`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRng {
    seed: u32,
    state: u32,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Restore an RNG from a saved seed and register
    pub fn from_state(seed: u32, state: u32) -> Self {
        Self { seed, state }
    }

    /// The seed this stream was created from
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Get the current register (useful for saving/loading)
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Generate the next raw u32 value
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Random index in `0..len` as `floor(next * len)`
    ///
    /// Returns 0 for an empty range without consuming a value.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Generate a random i64 in range [min, max]
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next_f64() * span).floor() as i64
    }

    /// Generate a random bool with given probability of true
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Shuffle a slice in place (Fisher-Yates, high index first)
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.index(i + 1);
            slice.swap(i, j);
        }
    }

    /// Pick a random element from a slice
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let i = self.index(slice.len());
            slice.get(i)
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Hash free text into a seed
///
/// `hash = hash * 31 + unit` over UTF-16 code units with 32-bit signed
/// wrap-around, then the absolute value. "ALPHA" always maps to the same
/// seed no matter which client typed it.
pub fn seed_from_str(text: &str) -> u32 {
    let hash = text
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

/// A fresh, non-deterministic seed for a new game
pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..RANDOM_SEED_LIMIT)
}

/// Render a seed as a shareable code (zero-padded to six digits)
pub fn format_seed(seed: u32) -> String {
    format!("{:0width$}", seed, width = SEED_CODE_WIDTH)
}

/// Turn whatever a player typed into a seed
///
/// All-digit input that fits a u32 is read as a number, so
/// `parse_seed_input(&format_seed(s)) == s`. Anything else is hashed with
/// [`seed_from_str`].
pub fn parse_seed_input(input: &str) -> u32 {
    let trimmed = input.trim();
    let numeric = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit());
    if numeric {
        if let Ok(seed) = trimmed.parse::<u32>() {
            return seed;
        }
    }
    seed_from_str(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_three(seed: u32) -> [u32; 3] {
        let mut rng = GameRng::new(seed);
        [rng.next_u32(), rng.next_u32(), rng.next_u32()]
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(first_three(0), [1144304738, 1416247, 958946056]);
        assert_eq!(first_three(1), [2693262067, 11749833, 2265367787]);
        assert_eq!(first_three(42), [2581720956, 1925393290, 3661312704]);
        assert_eq!(first_three(123456), [1642107918, 3424218114, 4280064779]);
        assert_eq!(first_three(u32::MAX), [3850105811, 813802916, 3073704848]);
    }

    #[test]
    fn test_f64_matches_u32() {
        let mut rng = GameRng::new(42);
        let f = rng.next_f64();
        assert_eq!(f, 2581720956.0 / 4294967296.0);
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(seed_from_str("ALPHA"));
        let mut rng2 = GameRng::new(seed_from_str("ALPHA"));

        let a: Vec<f64> = (0..50).map(|_| rng1.next_f64()).collect();
        let b: Vec<f64> = (0..50).map(|_| rng2.next_f64()).collect();
        assert_eq!(a, b);
        assert_eq!(a.iter().map(|f| f.to_bits()).collect::<Vec<_>>(), b.iter().map(|f| f.to_bits()).collect::<Vec<_>>());
    }

    #[test]
    fn test_alpha_stream() {
        let mut rng = GameRng::new(seed_from_str("ALPHA"));
        let got: Vec<u32> = (0..5).map(|_| rng.next_u32()).collect();
        assert_eq!(got, vec![3119962996, 3628291471, 2308385590, 3390909627, 4103133919]);
    }

    #[test]
    fn test_distinct_seeds_differ() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(8);
        let a: Vec<u32> = (0..10).map(|_| rng1.next_u32()).collect();
        let b: Vec<u32> = (0..10).map(|_| rng2.next_u32()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_range() {
        for seed in [0, 1, 42, 999_999, u32::MAX] {
            let mut rng = GameRng::new(seed);
            for _ in 0..1000 {
                let f = rng.next_f64();
                assert!((0.0..1.0).contains(&f));
            }
        }

        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let i = rng.range_i64(10, 20);
            assert!((10..=20).contains(&i));
            assert!(rng.index(7) < 7);
        }
    }

    #[test]
    fn test_save_restore() {
        let mut rng = GameRng::new(99);
        rng.next_u32();
        let mut restored = GameRng::from_state(rng.seed(), rng.state());
        assert_eq!(rng.next_u32(), restored.next_u32());
    }

    #[test]
    fn test_seed_from_str() {
        assert_eq!(seed_from_str("ALPHA"), 62372158);
        assert_eq!(seed_from_str("DARTS"), 64817332);
        assert_eq!(seed_from_str(""), 0);
        assert_eq!(seed_from_str("a"), 97);
        assert_eq!(seed_from_str("hello world"), 1794106052);
        assert_eq!(seed_from_str("zzzzzzzzzzzzzzzzzzzz"), 1718487168);
        assert_eq!(seed_from_str("STATION SIEGE"), 2140841023);
        assert_eq!(seed_from_str("negative?"), 1510311254);
        assert_eq!(seed_from_str("heist"), 99159661);
        assert_eq!(seed_from_str("Zombie Slayer"), 369499128);
    }

    #[test]
    fn test_seed_codes() {
        assert_eq!(format_seed(42), "000042");
        assert_eq!(format_seed(123456), "123456");
        assert_eq!(format_seed(4_294_967_295), "4294967295");

        for seed in [0, 7, 42, 999_999, 1_000_000, u32::MAX] {
            assert_eq!(parse_seed_input(&format_seed(seed)), seed);
        }

        assert_eq!(parse_seed_input("  000123 "), 123);
        assert_eq!(parse_seed_input("ALPHA"), seed_from_str("ALPHA"));
        // Too large for u32 falls back to hashing
        assert_eq!(parse_seed_input("99999999999"), seed_from_str("99999999999"));
    }

    #[test]
    fn test_random_seed_is_six_digits() {
        for _ in 0..100 {
            assert!(random_seed() < 1_000_000);
        }
    }

    #[test]
    fn test_shuffle() {
        let mut rng = GameRng::new(42);
        let mut numbers: Vec<u8> = (1..=20).collect();
        rng.shuffle(&mut numbers);
        assert_eq!(
            numbers,
            vec![14, 1, 20, 5, 7, 2, 10, 17, 15, 18, 6, 11, 19, 4, 8, 3, 12, 16, 9, 13]
        );
    }

    #[test]
    fn test_pick() {
        let mut rng = GameRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert!(rng.pick(&[1, 2, 3]).is_some());
    }
}
