use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseSeedError, PieceKind};

/// Chooses the kind of every newly spawned piece.
///
/// Keeps one kind of look-ahead so the upcoming piece can be previewed.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceKind};
///
/// let mut generator = PieceGenerator::constant(PieceKind::T);
/// assert_eq!(generator.peek_next(), PieceKind::T);
/// assert_eq!(generator.pop_next(), PieceKind::T);
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    source: PieceSource,
    next: PieceKind,
}

#[derive(Debug, Clone)]
enum PieceSource {
    Random(Pcg32),
    Constant(PieceKind),
}

impl PieceSource {
    fn draw(&mut self) -> PieceKind {
        match self {
            PieceSource::Random(rng) => rng.random(),
            PieceSource::Constant(kind) => *kind,
        }
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a uniformly random generator with a random seed.
    ///
    /// For a reproducible sequence, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_source(PieceSource::Random(Pcg32::from_seed(seed.0)))
    }

    /// Creates a generator that always yields `kind`.
    #[must_use]
    pub fn constant(kind: PieceKind) -> Self {
        Self::from_source(PieceSource::Constant(kind))
    }

    fn from_source(mut source: PieceSource) -> Self {
        let next = source.draw();
        Self { source, next }
    }

    /// Returns the kind the next call to [`Self::pop_next`] will yield.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.next
    }

    /// Takes the upcoming kind and draws a new one behind it.
    pub fn pop_next(&mut self) -> PieceKind {
        let drawn = self.source.draw();
        std::mem::replace(&mut self.next, drawn)
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit (16-byte) seed for the generator's random number source. Serialized and parsed
/// as 32 hexadecimal digits.
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
/// for _ in 0..20 {
///     assert_eq!(a.pop_next(), b.pop_next());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::new(s));
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::new(s))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    #[test]
    fn test_constant_generator() {
        let mut generator = PieceGenerator::constant(PieceKind::S);
        for _ in 0..5 {
            assert_eq!(generator.pop_next(), PieceKind::S);
        }
    }

    #[test]
    fn test_peek_matches_pop() {
        let mut generator = PieceGenerator::with_seed(SEED);
        for _ in 0..50 {
            let peeked = generator.peek_next();
            assert_eq!(generator.pop_next(), peeked);
        }
    }

    #[test]
    fn test_random_generator_covers_all_kinds() {
        let mut generator = PieceGenerator::with_seed(SEED);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[generator.pop_next() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "missing kinds: {seen:?}");
    }

    #[test]
    fn test_seed_parse_and_display() {
        let text = "0123456789abcdef0123456789abcdef";
        let seed: PieceSeed = text.parse().unwrap();
        assert_eq!(seed.to_string(), text);

        assert!("0123".parse::<PieceSeed>().is_err());
        assert!("zz23456789abcdef0123456789abcdef".parse::<PieceSeed>().is_err());
    }

    #[test]
    fn test_seed_serialization() {
        let serialized = serde_json::to_string(&SEED).unwrap();
        assert_eq!(serialized, "\"07070707070707070707070707070707\"");
        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, SEED);
        assert!(serde_json::from_str::<PieceSeed>("\"07\"").is_err());
    }
}
