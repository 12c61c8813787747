//! BME280 register map.
//!
//! Addresses and constants from the Bosch BME280 datasheet (BST-BME280-DS002),
//! section 5.3 "Memory map".

/// BME280 I2C default slave address (SDO tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x76;

/// Value of the `id` register on a genuine BME280.
pub const CHIP_ID: u8 = 0x60;

/// Writing this to [`Register::Reset`] runs the power-on-reset procedure.
pub const SOFT_RESET_CMD: u8 = 0xB6;

/// `status` bit 0: NVM calibration data is being copied to image registers.
pub const STATUS_IM_UPDATE: u8 = 0x01;
/// `status` bit 3: a conversion is running.
pub const STATUS_MEASURING: u8 = 0x08;

// Calibration block A: 0x88 - 0xA1 (dig_T1..dig_P9, one reserved byte, dig_H1)
pub const CALIB_TP_LEN: usize = 26;
// Calibration block B: 0xE1 - 0xE7 (dig_H2..dig_H6)
pub const CALIB_H_LEN: usize = 7;

// 0xF7 - 0xFE: press_msb .. hum_lsb
pub const DATA_LEN: usize = 8;

/// Raw pressure code reported when pressure oversampling is skipped.
pub const PRESSURE_SKIPPED: u32 = 0x80_0000;
/// Raw humidity code reported when humidity oversampling is skipped.
pub const HUMIDITY_SKIPPED: u32 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    CalibTp = 0x88,
    CalibH1 = 0xA1,
    Id = 0xD0,
    Reset = 0xE0,
    CalibH = 0xE1,
    CtrlHum = 0xF2,
    Status = 0xF3,
    CtrlMeas = 0xF4,
    Config = 0xF5,
    PressMsb = 0xF7,
    TempMsb = 0xFA,
    HumMsb = 0xFD,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    fn from(register: Register) -> u8 {
        register.addr()
    }
}
