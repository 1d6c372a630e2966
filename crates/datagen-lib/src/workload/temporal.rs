//! Temporal pattern model
//!
//! Pure functions mapping time of day and day of week to multiplicative
//! load scalars.

use std::f64::consts::PI;

/// Fraction of the day at which diurnal load peaks (14:00)
pub const PEAK_HOUR: f64 = 14.0 / 24.0;

/// Fraction of the week after which the weekend begins
pub const WEEKEND_START: f64 = 5.0 / 7.0;

/// Time-of-day multiplier: `1 + factor` at 14:00, `1 - factor` twelve hours later
pub fn diurnal(hour: f64, factor: f64) -> f64 {
    1.0 + factor * (2.0 * PI * (hour - PEAK_HOUR + 0.25)).sin()
}

/// Day-of-week multiplier, lower on weekends
pub fn weekly(day: f64, factor: f64) -> f64 {
    if day > WEEKEND_START {
        1.0 - 0.3 * factor
    } else {
        1.0 + 0.1 * factor
    }
}

/// Combined multiplier for a profile's diurnal factor
pub fn temporal_multiplier(hour: f64, day: f64, diurnal_factor: f64) -> f64 {
    diurnal(hour, diurnal_factor) * weekly(day, diurnal_factor / 2.0)
}
