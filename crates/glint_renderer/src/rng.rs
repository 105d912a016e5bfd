//! Pseudo-random sampling over caller-owned state.
//!
//! Every function is a pure transform of the 32-bit state it is handed, so
//! each pixel can carry its own independent stream and parallel dispatch
//! never contends on shared RNG state. The hash is the PCG output mix; it
//! is fast and non-cryptographic.

use glam::Vec3;
use rand::Rng;

/// PCG-style integer mix.
#[inline]
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Advance the state and return a fresh pseudo-random value.
#[inline]
pub fn next_u32(state: &mut u32) -> u32 {
    *state = pcg_hash(*state);
    *state
}

/// Uniform float in `[0, 1)`, built from the top 24 bits so the mantissa is
/// filled exactly and 1.0 is never produced.
#[inline]
pub fn next_f32(state: &mut u32) -> f32 {
    (next_u32(state) >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Rejection-sample a point with length <= 1.
pub fn in_unit_sphere(state: &mut u32) -> Vec3 {
    loop {
        let v = Vec3::new(
            next_f32(state) * 2.0 - 1.0,
            next_f32(state) * 2.0 - 1.0,
            next_f32(state) * 2.0 - 1.0,
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Rejection sampling through the `rand` trait, for the non-fast path.
pub fn in_unit_sphere_with<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_pcg_hash_is_deterministic() {
        assert_eq!(pcg_hash(0), pcg_hash(0));
        assert_eq!(pcg_hash(12345), pcg_hash(12345));
        assert_ne!(pcg_hash(1), pcg_hash(2));
    }

    #[test]
    fn test_streams_with_same_seed_match() {
        let mut a = 42u32;
        let mut b = 42u32;
        for _ in 0..100 {
            assert_eq!(next_u32(&mut a), next_u32(&mut b));
        }
    }

    #[test]
    fn test_next_f32_stays_in_unit_interval() {
        let mut state = 7u32;
        for _ in 0..10_000 {
            let x = next_f32(&mut state);
            assert!((0.0..1.0).contains(&x), "out of range: {x}");
        }
    }

    #[test]
    fn test_in_unit_sphere_length() {
        let mut state = 99u32;
        for _ in 0..1_000 {
            assert!(in_unit_sphere(&mut state).length() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_in_unit_sphere_with_rng_length() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert!(in_unit_sphere_with(&mut rng).length() <= 1.0 + 1e-6);
        }
    }
}
