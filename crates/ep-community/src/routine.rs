//! Daily timetable and behavior constants shared by a whole community.

/// Opening hours, shifts and behavioral constants used by the movement engine.
///
/// All hours are hours of day in `0..24`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DailyRoutine {
    /// First hour shops accept customers.
    pub shop_open_hour:        u32,
    /// Shops close at the start of this hour.
    pub shop_close_hour:       u32,
    /// Hour workers and students leave home, and travelers depart.
    pub work_start_hour:       u32,
    pub work_end_hour:         u32,
    pub school_end_hour:       u32,
    /// Daily return chance of a traveler after three days away; scales
    /// linearly with days away.
    pub travel_return_chance:  f64,
    /// Persons with an acceptance factor below this may ignore symptoms.
    pub symptom_ignore_below:  f64,
    /// Chance that such a person ignores symptoms on a given day.
    pub symptom_ignore_chance: f64,
    /// Upper bound (inclusive) of outside contacts per traveler per hour.
    pub max_travel_contacts:   u32,
}

impl DailyRoutine {
    /// `open <= hour < close`.
    #[inline]
    pub fn shops_open_at(&self, hour: u32) -> bool {
        (self.shop_open_hour..self.shop_close_hour).contains(&hour)
    }
}

impl Default for DailyRoutine {
    fn default() -> Self {
        Self {
            shop_open_hour:        9,
            shop_close_hour:       20,
            work_start_hour:       8,
            work_end_hour:         17,
            school_end_hour:       15,
            travel_return_chance:  0.3,
            symptom_ignore_below:  0.3,
            symptom_ignore_chance: 0.5,
            max_travel_contacts:   5,
        }
    }
}
