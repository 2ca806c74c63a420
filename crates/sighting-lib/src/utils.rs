//! Utility functions for temperature scale conversions
//!
//! All conversions are total over finite input and never fail.

/// Offset between the Kelvin and Celsius scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Freezing point of water in Fahrenheit
const FAHRENHEIT_FREEZING: f64 = 32.0;

/// Precomputed constant: 5.0 / 9.0
const F_TO_C_FACTOR: f64 = 5.0 / 9.0;

/// Precomputed constant: 9.0 / 5.0
const C_TO_F_FACTOR: f64 = 9.0 / 5.0;

/// Convert a temperature from Fahrenheit to Celsius
#[inline(always)]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - FAHRENHEIT_FREEZING) * F_TO_C_FACTOR
}

/// Convert a temperature from Kelvin to Celsius
///
/// The weather API reports temperatures in Kelvin unless asked otherwise.
#[inline(always)]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Convert a temperature from Celsius to Fahrenheit
#[inline(always)]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * C_TO_F_FACTOR + FAHRENHEIT_FREEZING
}

/// Convert a temperature from Kelvin to Fahrenheit
#[inline(always)]
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    celsius_to_fahrenheit(kelvin_to_celsius(kelvin))
}
