use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random eight-digit seed code, short enough to show and type in a UI.
pub fn generate_seed8() -> u32 {
    rand::rng().random_range(0u32..100_000_000u32)
}

pub fn expand_seed64(code: u32) -> u64 {
    splitmix64(code as u64)
}

pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derives a fresh, independent generator from `parent`.
///
/// The parent advances by exactly one `u64` draw, so the sequence of derived
/// streams is reproducible for a fixed parent seed.
pub fn fork_rng<R: Rng + ?Sized>(parent: &mut R) -> StdRng {
    StdRng::seed_from_u64(splitmix64(parent.random::<u64>()))
}
