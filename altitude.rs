//! Barometric altitude and sea-level pressure formulas.
//!
//! Pressures are in hPa, temperatures in °C, heights in metres.

// 1 / 5.257, the exponent of the hypsometric formula
const HYPSOMETRIC_EXP: f32 = 0.190_223;
const LAPSE_RATE: f32 = 0.0065;
const KELVIN: f32 = 273.15;

// Station-to-sea-level reduction constants
const REDUCTION_EXP: f32 = 0.190_284;
const REDUCTION_COEF: f32 = 8.422_88e-5;
const REDUCTION_OFFSET: f32 = 0.3;

/// Height above the sea-level reference, from the hypsometric formula.
///
/// ```text
///     ((P0 / P)^(1/5.257) - 1) * (T + 273.15)
/// h = ---------------------------------------
///                     0.0065
/// ```
pub fn pressure_to_altitude(sea_level: f32, atmospheric: f32, temp: f32) -> f32 {
    ((sea_level / atmospheric).powf(HYPSOMETRIC_EXP) - 1.0) * (temp + KELVIN) / LAPSE_RATE
}

/// Sea-level pressure for a reading taken at `altitude`; inverse of
/// [`pressure_to_altitude`].
pub fn sea_level_for_altitude(altitude: f32, atmospheric: f32, temp: f32) -> f32 {
    ((altitude * LAPSE_RATE) / (temp + KELVIN) + 1.0).powf(1.0 / HYPSOMETRIC_EXP) * atmospheric
}

/// Projects a station-level reading to sea level for a fixed station height.
pub fn sea_level_pressure(measured: f32, station_altitude: i32) -> f32 {
    let base = measured - REDUCTION_OFFSET;
    let ratio = station_altitude as f32 / base.powf(REDUCTION_EXP);

    base * (1.0 + REDUCTION_COEF * ratio).powf(1.0 / REDUCTION_EXP)
}
