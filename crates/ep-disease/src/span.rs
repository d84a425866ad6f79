//! Inclusive `[min, max]` interval that a disease samples from.

use rand::Rng;
use rand::distributions::uniform::SampleUniform;

/// A closed interval sampled uniformly on every draw.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd + SampleUniform> Span<T> {
    #[inline]
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Degenerate interval containing only `value`.
    #[inline]
    pub fn fixed(value: T) -> Self {
        Self { min: value, max: value }
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Draw one value uniformly from `[min, max]`.
    ///
    /// Only called on spans validated by [`DiseaseBuilder`][crate::DiseaseBuilder],
    /// so `min <= max` holds.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.gen_range(self.min..=self.max)
    }
}
