//! Decade-wide age buckets used for mortality lookup.

use std::fmt;

/// One of nine age buckets: 0–9, 10–19, …, 70–79, 80+.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgeGroup(u8);

impl AgeGroup {
    /// Number of buckets in a mortality table.
    pub const COUNT: usize = 9;

    /// The oldest bucket (80+).
    pub const OLDEST: AgeGroup = AgeGroup(8);

    /// Bucket for a person aged `years`: `min(years / 10, 8)`.
    #[inline]
    pub fn from_years(years: u32) -> Self {
        AgeGroup((years / 10).min(8) as u8)
    }

    /// Bucket by raw index; anything past the last bucket degrades to 80+.
    #[inline]
    pub fn from_bucket(bucket: usize) -> Self {
        AgeGroup(bucket.min(Self::COUNT - 1) as u8)
    }

    #[inline]
    pub fn bucket(self) -> usize {
        self.0 as usize
    }

    /// Every bucket, youngest first.
    pub fn all() -> impl Iterator<Item = AgeGroup> {
        (0..Self::COUNT).map(AgeGroup::from_bucket)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 as usize == Self::COUNT - 1 {
            write!(f, "80+")
        } else {
            write!(f, "{}-{}", self.0 as u32 * 10, self.0 as u32 * 10 + 9)
        }
    }
}
