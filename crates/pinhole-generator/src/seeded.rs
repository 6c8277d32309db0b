use crate::Generator;
use pinhole_core::{ShortCode, ALPHABET, CODE_LENGTH};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::sync::{Mutex, PoisonError};

/// Secret used when the environment does not supply one.
pub const DEFAULT_SEED: &str = r")Bo_ItkHpnwoM7PiK9\J]QTER\uGB#2";

/// A 32-byte PRNG seed derived from a secret through SHA-256.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Seed([u8; 32]);

impl Seed {
    /// Hashes an arbitrary secret into a seed.
    pub fn from_secret(secret: &str) -> Self {
        Self(Sha256::digest(secret.as_bytes()).into())
    }

    /// Uses `secret` when it is present and non-empty, else [`DEFAULT_SEED`].
    pub fn from_optional_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(secret) if !secret.is_empty() => Self::from_secret(secret),
            _ => Self::default(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::from_secret(DEFAULT_SEED)
    }
}

// The seed is derived from a secret, keep it out of logs.
impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

struct GeneratorState {
    rng: ChaCha8Rng,
    alphabet: [u8; 32],
}

/// Random short code generator over a seed-dependent alphabet.
///
/// The alphabet is shuffled once with a ChaCha8 stream keyed by the seed,
/// then every code draws [`CODE_LENGTH`] symbols uniformly with
/// replacement. The same seed always produces the same sequence of codes,
/// across releases too: the stream must stay ChaCha8.
pub struct SeededGenerator {
    state: Mutex<GeneratorState>,
}

impl SeededGenerator {
    pub fn new(seed: Seed) -> Self {
        let mut rng = ChaCha8Rng::from_seed(seed.0);
        let mut alphabet = *ALPHABET;
        alphabet.shuffle(&mut rng);

        Self {
            state: Mutex::new(GeneratorState { rng, alphabet }),
        }
    }

    /// The shuffled alphabet codes are drawn from.
    pub fn alphabet(&self) -> [u8; 32] {
        self.lock().alphabet
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GeneratorState> {
        // A panic elsewhere cannot leave the rng in a torn state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SeededGenerator {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

impl Generator for SeededGenerator {
    fn generate(&self) -> ShortCode {
        let mut state = self.lock();
        let GeneratorState { rng, alphabet } = &mut *state;

        let mut symbols = [0u8; CODE_LENGTH];
        for symbol in &mut symbols {
            *symbol = alphabet[rng.gen_range(0..alphabet.len())];
        }
        ShortCode::from_symbols(symbols)
    }
}
