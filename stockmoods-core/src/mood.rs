//! Mood selection
//!
//! The companion classifies the day's percent change into a mood code and the
//! watch maps that code onto one of the face icons.

/// Mood code for a change above +0.50 %
pub const MOOD_HAPPY: i32 = 0;

/// Mood code for a change in (0, +0.50] %
pub const MOOD_INDIFFERENT: i32 = 1;

/// Mood code for a flat or falling stock
pub const MOOD_SAD: i32 = 2;

/// Threshold between indifferent and happy, in hundredths of a percent
const HAPPY_THRESHOLD_HUNDREDTHS: i32 = 50;

/// Face shown in the icon region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoodIcon {
    Happy,
    Indifferent,
    Sad,
    /// No quote received yet
    #[default]
    NoConnection,
}

/// Map a mood code to its icon
///
/// `0` is happy and `1` indifferent; every other value, negative ones
/// included, is sad.
pub fn select_icon(code: i32) -> MoodIcon {
    match code {
        MOOD_HAPPY => MoodIcon::Happy,
        MOOD_INDIFFERENT => MoodIcon::Indifferent,
        _ => MoodIcon::Sad,
    }
}

/// The companion's classification of a percent change
///
/// `change_hundredths` is the change in hundredths of a percent, so `150`
/// means +1.50 %.
pub fn mood_code_for_change(change_hundredths: i32) -> i32 {
    if change_hundredths > HAPPY_THRESHOLD_HUNDREDTHS {
        MOOD_HAPPY
    } else if change_hundredths > 0 {
        MOOD_INDIFFERENT
    } else {
        MOOD_SAD
    }
}
