use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 售价和刷新点共用的带种子 RNG
#[derive(Resource)]
pub struct GameRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// `0..len` 内的均匀下标；`len` 不能为零
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
