//! Random short code generation.
//!
//! The generator knows nothing about existing codes; collision detection and
//! retry belong to [`crate::application::services::RegistryService`].

use rand::Rng;

/// Default alphabet: upper and lower case ASCII letters followed by digits.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Produces fixed-length codes whose characters are drawn uniformly and
/// independently from an alphabet.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator over a custom alphabet.
    ///
    /// Duplicate symbols are kept, which skews the distribution; callers pass
    /// distinct characters.
    ///
    /// Returns `None` if the alphabet is empty or `length` is zero.
    pub fn with_alphabet(alphabet: &str, length: usize) -> Option<Self> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() || length == 0 {
            return None;
        }

        Some(Self { alphabet, length })
    }

    /// Generates one random code.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Number of distinct codes this generator can produce, saturating at `u64::MAX`.
    pub fn keyspace(&self) -> u64 {
        let base = self.alphabet.len() as u64;
        (0..self.length).fold(1u64, |acc, _| acc.saturating_mul(base))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}
