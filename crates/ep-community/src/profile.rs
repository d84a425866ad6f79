//! Static per-person behavior parameters.

/// How a person shops, travels and complies, fixed for the whole run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorProfile {
    /// Days between grocery runs.
    pub food_interval_days:     u32,
    /// Days between hardware-store runs.
    pub hardware_interval_days: u32,
    /// Compliance in `[0, 1]`.  Higher values lower the chance of catching the
    /// disease on a contact and of ignoring symptoms.
    pub acceptance:             f64,
    /// Daily probability of leaving for a trip.
    pub travel_need:            f64,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            food_interval_days:     3,
            hardware_interval_days: 14,
            acceptance:             0.5,
            travel_need:            0.0,
        }
    }
}
