//! Random vehicle arrivals on the two approaches.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Faces on the arrival die. A roll of 0 counts as an arrival, so each
/// approach sees a vehicle with probability 1/6 per second.
const ARRIVAL_DIE_FACES: u32 = 6;

/// Which approaches saw a vehicle this second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrivalDraw {
    pub ns: bool,
    pub we: bool,
}

/// Per-second arrival sampler, the only source of randomness in the
/// controller. Holds a seeded RNG when reproducibility is required,
/// otherwise draws from the thread RNG.
#[derive(Debug)]
pub struct ArrivalSimulator {
    rng: Option<StdRng>,
}

impl Default for ArrivalSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrivalSimulator {
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Sampler backed by a seeded RNG, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw once for each approach. North-south is always drawn first so
    /// seeded runs reproduce exactly.
    pub fn sample(&mut self) -> ArrivalDraw {
        let ns = self.roll();
        let we = self.roll();
        ArrivalDraw { ns, we }
    }

    fn roll(&mut self) -> bool {
        let face = match &mut self.rng {
            Some(rng) => rng.random_range(0..ARRIVAL_DIE_FACES),
            None => rand::rng().random_range(0..ARRIVAL_DIE_FACES),
        };
        face == 0
    }
}
