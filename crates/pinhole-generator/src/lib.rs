pub mod seeded;
pub mod seq;

pub use seeded::{Seed, SeededGenerator, DEFAULT_SEED};
pub use seq::SeqGenerator;

use pinhole_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// They are not required to avoid collisions: the store checks every
/// generated code against what it already holds.
pub trait Generator: Send + Sync + 'static {
    /// Generates the next short code, advancing the generator state.
    fn generate(&self) -> ShortCode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_usable_as_trait_objects() {
        let generators: Vec<Box<dyn Generator>> = vec![
            Box::new(SeededGenerator::new(Seed::default())),
            Box::new(SeqGenerator::with_prefix("wh")),
        ];

        for generator in &generators {
            let first = generator.generate();
            let second = generator.generate();
            assert_ne!(first, second);
        }
    }
}
