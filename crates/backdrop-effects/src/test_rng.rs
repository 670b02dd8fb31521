//! Deterministic random source for tests.

use rand::RngCore;

/// Replays a fixed cycle of unit-interval draws.
///
/// Each value `v` in `[0, 1)` comes back out of `rng.random::<f64>()` as `v`
/// (to within 2^-53).
#[derive(Debug, Clone)]
pub struct FixedRng {
    values: Vec<f64>,
    next: usize,
}

impl FixedRng {
    pub fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty());
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(&[value])
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        ((value * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
