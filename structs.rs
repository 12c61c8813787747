use crate::registers::{CALIB_H_LEN, CALIB_TP_LEN, DATA_LEN};

/// Factory-trimmed compensation coefficients.
///
/// Read once, right after the soft reset, from two blocks:
/// 0x88 - 0xA1 (temperature, pressure and `dig_H1`) and 0xE1 - 0xE7 (the rest
/// of humidity). Never modified afterwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub t1: u16, // 0x88..0x89
    pub t2: i16, // 0x8A..0x8B
    pub t3: i16, // 0x8C..0x8D
    pub p1: u16, // 0x8E..0x8F
    pub p2: i16, // 0x90..0x91
    pub p3: i16, // 0x92..0x93
    pub p4: i16, // 0x94..0x95
    pub p5: i16, // 0x96..0x97
    pub p6: i16, // 0x98..0x99
    pub p7: i16, // 0x9A..0x9B
    pub p8: i16, // 0x9C..0x9D
    pub p9: i16, // 0x9E..0x9F
    pub h1: u8,  // 0xA1
    pub h2: i16, // 0xE1..0xE2
    pub h3: u8,  // 0xE3
    pub h4: i16, // 0xE4[7:0] -> [11:4], 0xE5[3:0] -> [3:0]
    pub h5: i16, // 0xE5[7:4] -> [3:0], 0xE6[7:0] -> [11:4]
    pub h6: i8,  // 0xE7
}

impl Calibration {
    /// Builds the coefficients from the two raw calibration blocks.
    ///
    /// `tp` starts at 0x88 and `h` starts at 0xE1. `dig_H4` and `dig_H5` share
    /// register 0xE5 and are signed 12-bit values, so their upper byte is
    /// sign-extended before the nibble is merged in.
    pub fn from_blocks(tp: &[u8; CALIB_TP_LEN], h: &[u8; CALIB_H_LEN]) -> Self {
        let le_u16 = |i: usize| u16::from_le_bytes([tp[i], tp[i + 1]]);
        let le_i16 = |i: usize| i16::from_le_bytes([tp[i], tp[i + 1]]);

        Calibration {
            t1: le_u16(0),
            t2: le_i16(2),
            t3: le_i16(4),
            p1: le_u16(6),
            p2: le_i16(8),
            p3: le_i16(10),
            p4: le_i16(12),
            p5: le_i16(14),
            p6: le_i16(16),
            p7: le_i16(18),
            p8: le_i16(20),
            p9: le_i16(22),
            // tp[24] (0xA0) is reserved
            h1: tp[25],
            h2: i16::from_le_bytes([h[0], h[1]]),
            h3: h[2],
            h4: (i16::from(h[3] as i8) << 4) | i16::from(h[4] & 0x0F),
            h5: (i16::from(h[5] as i8) << 4) | i16::from(h[4] >> 4),
            h6: h[6] as i8,
        }
    }
}

/// Uncompensated ADC codes as they come out of the data registers.
///
/// Pressure and temperature keep the full 24-bit burst word (msb, lsb, xlsb)
/// so the "skipped" sentinel can be recognised; the 20-bit ADC code is the
/// word shifted right by four.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawData {
    pub pressure: u32,
    pub temperature: u32,
    pub humidity: u32,
}

impl RawData {
    /// Splits the 0xF7 - 0xFE burst into the three channels.
    pub fn from_burst(data: &[u8; DATA_LEN]) -> Self {
        RawData {
            pressure: be24(&[data[0], data[1], data[2]]),
            temperature: be24(&[data[3], data[4], data[5]]),
            humidity: (u32::from(data[6]) << 8) | u32::from(data[7]),
        }
    }
}

/// Big-endian 24-bit word from a three register burst.
fn be24(bytes: &[u8; 3]) -> u32 {
    (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    // BMP280 datasheet sample coefficients plus a typical humidity set.
    const TP_BLOCK: [u8; CALIB_TP_LEN] = [
        0x70, 0x6B, // T1 = 27504
        0x43, 0x67, // T2 = 26435
        0x18, 0xFC, // T3 = -1000
        0x7D, 0x8E, // P1 = 36477
        0x43, 0xD6, // P2 = -10685
        0xD0, 0x0B, // P3 = 3024
        0x27, 0x0B, // P4 = 2855
        0x8C, 0x00, // P5 = 140
        0xF9, 0xFF, // P6 = -7
        0x8C, 0x3C, // P7 = 15500
        0xF8, 0xC6, // P8 = -14600
        0x70, 0x17, // P9 = 6000
        0x00, // reserved
        0x4B, // H1 = 75
    ];

    const H_BLOCK: [u8; CALIB_H_LEN] = [
        0x6A, 0x01, // H2 = 362
        0x00, // H3 = 0
        0x13, 0x29, 0x03, // H4 = 313, H5 = 50
        0x1E, // H6 = 30
    ];

    #[test]
    fn parses_temperature_and_pressure_coefficients() {
        let calib = Calibration::from_blocks(&TP_BLOCK, &H_BLOCK);

        assert_eq!((calib.t1, calib.t2, calib.t3), (27504, 26435, -1000));
        assert_eq!(
            [
                calib.p2, calib.p3, calib.p4, calib.p5, calib.p6, calib.p7, calib.p8, calib.p9
            ],
            [-10685, 3024, 2855, 140, -7, 15500, -14600, 6000]
        );
        assert_eq!(calib.p1, 36477);
    }

    #[test]
    fn parses_packed_humidity_coefficients() {
        let calib = Calibration::from_blocks(&TP_BLOCK, &H_BLOCK);

        assert_eq!(calib.h1, 75);
        assert_eq!(calib.h2, 362);
        assert_eq!(calib.h3, 0);
        assert_eq!(calib.h4, 313);
        assert_eq!(calib.h5, 50);
        assert_eq!(calib.h6, 30);
    }

    #[test]
    fn packed_humidity_coefficients_keep_their_sign() {
        let h_block = [0x00, 0x80, 0xFF, 0xF0, 0xA1, 0xFE, 0xF6];
        let calib = Calibration::from_blocks(&TP_BLOCK, &h_block);

        assert_eq!(calib.h2, i16::MIN);
        assert_eq!(calib.h3, 0xFF);
        // 0xF0 << 4 | 0x1
        assert_eq!(calib.h4, -255);
        // 0xFE << 4 | 0xA
        assert_eq!(calib.h5, -22);
        assert_eq!(calib.h6, -10);
    }

    #[test]
    fn splits_data_burst() {
        let raw = RawData::from_burst(&[0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30]);

        assert_eq!(raw.pressure >> 4, 415148);
        assert_eq!(raw.temperature >> 4, 519888);
        assert_eq!(raw.humidity, 30000);
    }
}
