//! Bosch fixed-point compensation formulas (datasheet section 4.2.3 and the
//! 64-bit pressure variant from section 8.2).
//!
//! Every function here is pure: raw ADC codes plus [`Calibration`] in,
//! physical values out. The pressure and humidity formulas both consume
//! `t_fine`, which must come from the same measurement cycle.

use crate::altitude::sea_level_pressure;
use crate::reading::{Reading, Unavailable};
use crate::registers::{HUMIDITY_SKIPPED, PRESSURE_SKIPPED};
use crate::structs::Calibration;

/// Plausible sea-level pressure band in hPa. Anything outside is treated as a
/// calibration or noise artifact.
pub const PRESSURE_RANGE_HPA: (f32, f32) = (850.0, 1090.0);

/// Upper clamp of the humidity intermediate: 100 %RH in Q22.10.
pub const HUMIDITY_MAX_Q22_10: i32 = 419_430_400;

/// Fine temperature from a 20-bit temperature code.
pub fn t_fine(calib: &Calibration, adc_t: i32) -> i32 {
    let t1 = i32::from(calib.t1);
    let t2 = i32::from(calib.t2);
    let t3 = i32::from(calib.t3);

    let var1 = ((adc_t >> 3) - (t1 << 1)).wrapping_mul(t2) >> 11;
    let delta = (adc_t >> 4) - t1;
    let var2 = (delta.wrapping_mul(delta) >> 12).wrapping_mul(t3) >> 14;

    var1.wrapping_add(var2)
}

/// Temperature in °C.
pub fn temperature(t_fine: i32) -> f32 {
    (t_fine.wrapping_mul(5).wrapping_add(128) >> 8) as f32 / 100.0
}

/// Pressure in Pa as Q24.8, or `None` when the formula would divide by zero.
pub fn pressure_q24_8(calib: &Calibration, t_fine: i32, adc_p: i32) -> Option<i64> {
    let p1 = i64::from(calib.p1);
    let p2 = i64::from(calib.p2);
    let p3 = i64::from(calib.p3);
    let p4 = i64::from(calib.p4);
    let p5 = i64::from(calib.p5);
    let p6 = i64::from(calib.p6);
    let p7 = i64::from(calib.p7);
    let p8 = i64::from(calib.p8);
    let p9 = i64::from(calib.p9);

    let mut var1 = i64::from(t_fine) - 128_000;
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
    var2 = var2.wrapping_add(p4 << 35);
    var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8)
        .wrapping_add(var1.wrapping_mul(p2) << 12);
    var1 = (1i64 << 47).wrapping_add(var1).wrapping_mul(p1) >> 33;

    if var1 == 0 {
        return None;
    }

    let mut p = 1_048_576 - i64::from(adc_p);
    p = ((p << 31).wrapping_sub(var2)).wrapping_mul(3125).wrapping_div(var1);
    var1 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    var2 = p8.wrapping_mul(p) >> 19;

    Some((p.wrapping_add(var1).wrapping_add(var2) >> 8) + (p7 << 4))
}

/// Humidity in %RH as Q22.10, clamped to 0..=100 %.
pub fn humidity_q22_10(calib: &Calibration, t_fine: i32, adc_h: i32) -> i32 {
    let h1 = i32::from(calib.h1);
    let h2 = i32::from(calib.h2);
    let h3 = i32::from(calib.h3);
    let h4 = i32::from(calib.h4);
    let h5 = i32::from(calib.h5);
    let h6 = i32::from(calib.h6);

    // two's complement wrap-around, as in the vendor's C code
    let v = t_fine.wrapping_sub(76_800);
    let x1 = (adc_h << 14)
        .wrapping_sub(h4 << 20)
        .wrapping_sub(h5.wrapping_mul(v))
        .wrapping_add(16_384)
        >> 15;
    let x2 = (v.wrapping_mul(h6) >> 10)
        .wrapping_mul((v.wrapping_mul(h3) >> 11).wrapping_add(32_768))
        >> 10;
    let x2 = x2.wrapping_add(2_097_152).wrapping_mul(h2).wrapping_add(8_192) >> 14;

    let mut v = x1.wrapping_mul(x2);
    let x3 = v >> 15;
    v = v.wrapping_sub((x3.wrapping_mul(x3) >> 7).wrapping_mul(h1) >> 4);

    v.clamp(0, HUMIDITY_MAX_Q22_10)
}

/// Temperature reading, one decimal.
pub fn convert_temperature(_: &Calibration, t_fine: i32, _: u32, _: i32) -> Reading {
    Reading::value(temperature(t_fine), 1)
}

/// Sea-level pressure reading from the raw 24-bit pressure word, two decimals.
pub fn convert_pressure(
    calib: &Calibration,
    t_fine: i32,
    raw: u32,
    station_altitude: i32,
) -> Reading {
    if raw == PRESSURE_SKIPPED {
        return Reading::NoData(Unavailable::ChannelDisabled);
    }

    let q24_8 = match pressure_q24_8(calib, t_fine, (raw >> 4) as i32) {
        Some(p) => p,
        None => return Reading::Degenerate,
    };

    // integer Pa first, then hPa
    let hpa = (q24_8 / 256) as f32 / 100.0;
    let adjusted = sea_level_pressure(hpa, station_altitude);

    let (min, max) = PRESSURE_RANGE_HPA;
    // also rejects NaN from a non-positive or unreducible pressure
    if !(min..=max).contains(&adjusted) {
        return Reading::NoData(Unavailable::OutOfRange);
    }

    Reading::value(adjusted, 2)
}

/// Humidity reading from the raw 16-bit humidity word, one decimal.
pub fn convert_humidity(calib: &Calibration, t_fine: i32, raw: u32, _: i32) -> Reading {
    if raw == HUMIDITY_SKIPPED {
        return Reading::NoData(Unavailable::ChannelDisabled);
    }

    let q22_10 = humidity_q22_10(calib, t_fine, raw as i32);
    Reading::value((q22_10 >> 12) as f32 / 1024.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Calibration {
        Calibration {
            t1: 27504,
            t2: 26435,
            t3: -1000,
            p1: 36477,
            p2: -10685,
            p3: 3024,
            p4: 2855,
            p5: 140,
            p6: -7,
            p7: 15500,
            p8: -14600,
            p9: 6000,
            h1: 75,
            h2: 362,
            h3: 0,
            h4: 313,
            h5: 50,
            h6: 30,
        }
    }

    const ADC_T: i32 = 519_888;
    const ADC_P: i32 = 415_148;
    const T_FINE: i32 = 128_422;

    #[test]
    fn fine_temperature_matches_reference() {
        assert_eq!(t_fine(&reference(), ADC_T), T_FINE);
        assert_eq!((T_FINE * 5 + 128) >> 8, 2508);
        assert!((temperature(T_FINE) - 25.08).abs() < 1e-4);
    }

    #[test]
    fn pressure_matches_reference() {
        let p = pressure_q24_8(&reference(), T_FINE, ADC_P);
        assert_eq!(p, Some(25_767_233));
        assert_eq!(25_767_233 / 256, 100_653);
    }

    #[test]
    fn zero_p1_is_degenerate() {
        let calib = Calibration {
            p1: 0,
            ..reference()
        };

        assert_eq!(pressure_q24_8(&calib, T_FINE, ADC_P), None);
        assert_eq!(
            convert_pressure(&calib, T_FINE, (ADC_P as u32) << 4, 0),
            Reading::Degenerate
        );
    }

    #[test]
    fn pressure_reading_is_adjusted_and_range_checked() {
        let raw = (ADC_P as u32) << 4;

        let at = |altitude| convert_pressure(&reference(), T_FINE, raw, altitude);

        assert_eq!(at(0).to_string(), "1006.23");
        assert_eq!(at(100).to_string(), "1018.24");
        assert_eq!(at(1000), Reading::NoData(Unavailable::OutOfRange));
        assert_eq!(at(-2000), Reading::NoData(Unavailable::OutOfRange));
    }

    #[test]
    fn nan_sea_level_pressure_has_no_data() {
        // saturated code: negative Q24.8 pressure, below the reduction offset
        let saturated = convert_pressure(&reference(), T_FINE, 0xFF_FFF0, 0);
        assert_eq!(saturated, Reading::NoData(Unavailable::OutOfRange));
        assert_eq!(saturated.to_string(), crate::reading::NO_DATA);

        // reduction base goes negative far below sea level
        let raw = (ADC_P as u32) << 4;
        assert!(sea_level_pressure(1006.23, -60_000).is_nan());
        assert_eq!(
            convert_pressure(&reference(), T_FINE, raw, -60_000),
            Reading::NoData(Unavailable::OutOfRange)
        );
    }

    #[test]
    fn extreme_codes_wrap_instead_of_overflowing() {
        let calib = Calibration {
            t1: 0,
            t2: i16::MAX,
            t3: i16::MAX,
            h1: u8::MAX,
            h2: i16::MAX,
            h3: u8::MAX,
            h4: 2047,
            h5: 2047,
            h6: i8::MAX,
            ..reference()
        };

        let fine = t_fine(&calib, 0xF_FFFF);
        assert_eq!(fine, -144);
        assert!((temperature(fine) + 0.03).abs() < 1e-6);
        assert!((0..=HUMIDITY_MAX_Q22_10).contains(&humidity_q22_10(&calib, fine, 0xFFFF)));
        assert!((0..=HUMIDITY_MAX_Q22_10).contains(&humidity_q22_10(&calib, i32::MAX, 0xFFFF)));

        for t_fine in [i32::MIN, i32::MAX] {
            match convert_pressure(&reference(), t_fine, 0xFF_FFF0, 0) {
                Reading::Value { value, .. } => {
                    assert!((PRESSURE_RANGE_HPA.0..=PRESSURE_RANGE_HPA.1).contains(&value))
                }
                Reading::Degenerate | Reading::NoData(_) => {}
            }
        }
    }

    #[test]
    fn skipped_channels_have_no_data() {
        assert_eq!(
            convert_pressure(&reference(), T_FINE, PRESSURE_SKIPPED, 0),
            Reading::NoData(Unavailable::ChannelDisabled)
        );
        assert_eq!(
            convert_humidity(&reference(), T_FINE, HUMIDITY_SKIPPED, 0),
            Reading::NoData(Unavailable::ChannelDisabled)
        );
    }

    #[test]
    fn humidity_matches_reference() {
        assert_eq!(humidity_q22_10(&reference(), T_FINE, 30_000), 230_678_058);
        assert_eq!(convert_humidity(&reference(), T_FINE, 30_000, 0).to_string(), "55.0");
        assert_eq!(convert_humidity(&reference(), T_FINE, 35_000, 0).to_string(), "82.7");
    }

    #[test]
    fn humidity_is_clamped() {
        // unclamped: -4504168 and 913229963
        assert_eq!(humidity_q22_10(&reference(), T_FINE, 20_000), 0);
        assert_eq!(humidity_q22_10(&reference(), T_FINE, 60_000), HUMIDITY_MAX_Q22_10);
        assert_eq!(convert_humidity(&reference(), T_FINE, 60_000, 0).to_string(), "100.0");
        assert_eq!(convert_humidity(&reference(), T_FINE, 0, 0).to_string(), "0.0");
    }

    #[test]
    fn temperature_reading_has_one_decimal() {
        assert_eq!(convert_temperature(&reference(), T_FINE, 0, 0).to_string(), "25.1");
    }
}
