//! Domain Services
//!
//! Pure mood transitions. Decay is a projection computed at read time from
//! the last interaction; it never advances the reference timestamp, so any
//! number of reads between two interactions cost the pet nothing extra.

use chrono::Utc;

use crate::domain::entities::MoodRecord;

/// Happiness points lost per hour without interaction
pub const DECAY_PER_HOUR: f64 = 4.0;

/// Happiness points gained per interaction
pub const BOOST_ON_PET: u8 = 5;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Current wall-clock time as fractional Unix seconds
pub fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Project happiness as of `now`
///
/// `last_interaction` is left untouched. A record from the future (clock
/// skew) is returned unchanged: decay never raises happiness.
///
/// Always project from the stored record. A projected record must never be
/// decayed again or persisted, since its reference timestamp still points
/// at the last interaction.
pub fn apply_decay(record: &MoodRecord, now: f64) -> MoodRecord {
    let elapsed_hours = (now - record.last_interaction) / SECONDS_PER_HOUR;
    let lost = (elapsed_hours * DECAY_PER_HOUR).floor();

    // NaN fails this comparison as well
    if !(lost > 0.0) {
        return *record;
    }

    let lost = lost.min(u8::MAX as f64) as u8;
    MoodRecord {
        happiness: record.happiness.saturating_sub(lost),
        last_interaction: record.last_interaction,
    }
}

/// Decay up to `now`, boost, and make `now` the new reference point
pub fn apply_interaction(record: &MoodRecord, now: f64) -> MoodRecord {
    let decayed = apply_decay(record, now);
    MoodRecord {
        happiness: decayed.happiness.saturating_add(BOOST_ON_PET),
        last_interaction: now,
    }
}
