//! the one random source every generation step draws from

use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

/// Uniform draws in `[0, 1)`, plus the integer helpers generation uses.
///
/// Integer draws are `floor(u * n)`, so `roll(n)` lands in `0..n`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    #[inline]
    fn roll(&mut self, n: u32) -> u32 {
        let r = (self.next_unit() * f64::from(n)).floor() as u32;
        r.min(n.saturating_sub(1))
    }

    /// fair coin, `true` on a rolled 1
    #[inline]
    fn coin(&mut self) -> bool {
        self.roll(2) == 1
    }
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// replays a fixed list of unit draws, wrapping around at the end
#[cfg(test)]
pub(crate) struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty());
        Self { values: values.to_vec(), cursor: 0 }
    }

    pub(crate) fn constant(value: f64) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
