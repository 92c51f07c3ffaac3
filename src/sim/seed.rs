// src/sim/seed.rs
use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Globaler Seed für alle stochastischen Teile der Simulation.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResource {
    pub seed: u64,
}

impl SeedResource {
    pub fn from_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_text<S: AsRef<str>>(text: S) -> Self {
        let mut hasher = DefaultHasher::new();
        text.as_ref().hash(&mut hasher);
        Self::from_seed(hasher.finish())
    }

    /// Frischer Generator, deterministisch für denselben Seed.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    pub fn reset_with_new_seed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl Default for SeedResource {
    fn default() -> Self {
        Self::from_seed(rand::random::<u64>())
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SeedChangedEvent {
    pub new_seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_text_seed_consistency() {
        let s1 = SeedResource::from_text("cienegas de lerma");
        let s2 = SeedResource::from_text("cienegas de lerma");
        assert_eq!(s1.seed, s2.seed);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed = SeedResource::from_seed(1337);
        let (mut rng_a, mut rng_b) = (seed.rng(), seed.rng());
        let a: Vec<u32> = (0..5).map(|_| rng_a.random()).collect();
        let b: Vec<u32> = (0..5).map(|_| rng_b.random()).collect();
        assert_eq!(a, b);
    }
}
