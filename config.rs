//! Sampling settings and driver configuration.
//!
//! The three control registers are laid out as in the datasheet, section 5.4:
//!
//! | Register          | Bits 7:5 | Bits 4:2  | Bits 1:0 |
//! |-------------------|----------|-----------|----------|
//! | `ctrl_hum` (0xF2) | -        | -         | `osrs_h` in bits 2:0 |
//! | `ctrl_meas` (0xF4)| `osrs_t` | `osrs_p`  | `mode`   |
//! | `config` (0xF5)   | `t_sb`   | `filter`  | `spi3w_en` (always 0) |

use crate::registers::DEFAULT_ADDRESS;

/// Device power mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// No measurements, lowest power.
    Sleep = 0b00,
    /// One measurement cycle, then back to sleep.
    Forced = 0b01,
    /// Measure, stand by for `t_sb`, repeat.
    Normal = 0b11,
}

/// Per-channel oversampling. `Skipped` disables the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Oversampling {
    Skipped = 0b000,
    X1 = 0b001,
    X2 = 0b010,
    X4 = 0b011,
    X8 = 0b100,
    X16 = 0b101,
}

/// IIR filter coefficient applied to temperature and pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Filter {
    Off = 0b000,
    X2 = 0b001,
    X4 = 0b010,
    X8 = 0b011,
    X16 = 0b100,
}

/// Inactive duration between conversions in normal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Standby {
    Ms0_5 = 0b000,
    Ms62_5 = 0b001,
    Ms125 = 0b010,
    Ms250 = 0b011,
    Ms500 = 0b100,
    Ms1000 = 0b101,
    Ms10 = 0b110,
    Ms20 = 0b111,
}

/// Operating mode, oversampling, filter and standby settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    pub mode: Mode,
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub humidity: Oversampling,
    pub filter: Filter,
    pub standby: Standby,
}

impl Default for SamplingConfig {
    /// Normal mode, x16 on every channel, filter off, 0.5 ms standby.
    fn default() -> Self {
        SamplingConfig {
            mode: Mode::Normal,
            temperature: Oversampling::X16,
            pressure: Oversampling::X16,
            humidity: Oversampling::X16,
            filter: Filter::Off,
            standby: Standby::Ms0_5,
        }
    }
}

impl SamplingConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_oversampling(
        mut self,
        temperature: Oversampling,
        pressure: Oversampling,
        humidity: Oversampling,
    ) -> Self {
        self.temperature = temperature;
        self.pressure = pressure;
        self.humidity = humidity;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_standby(mut self, standby: Standby) -> Self {
        self.standby = standby;
        self
    }

    /// `ctrl_hum` value. Only takes effect after the next `ctrl_meas` write.
    pub fn ctrl_hum(&self) -> u8 {
        self.humidity as u8
    }

    /// `ctrl_meas` value.
    pub fn ctrl_meas(&self) -> u8 {
        ((self.temperature as u8) << 5) | ((self.pressure as u8) << 2) | self.mode as u8
    }

    /// `config` value, with 3-wire SPI left disabled.
    pub fn config(&self) -> u8 {
        ((self.standby as u8) << 5) | ((self.filter as u8) << 2)
    }
}

/// Everything needed to bring a sensor up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// 7-bit bus address, used when the driver opens the bus itself.
    pub address: u8,
    /// Height of the station above sea level in metres.
    pub station_altitude: i32,
    /// Settings programmed at the end of initialization.
    pub sampling: SamplingConfig,
    /// Maximum number of 1 ms polls while calibration data is loading.
    pub calibration_poll_limit: u32,
    /// Maximum number of 1 ms polls for a forced conversion to finish.
    pub measurement_poll_limit: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            address: DEFAULT_ADDRESS,
            station_altitude: 0,
            sampling: SamplingConfig::default(),
            calibration_poll_limit: 100,
            // x16 on all three channels needs at most ~113 ms
            measurement_poll_limit: 200,
        }
    }
}

impl DriverConfig {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_station_altitude(mut self, metres: i32) -> Self {
        self.station_altitude = metres;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_poll_limits(mut self, calibration: u32, measurement: u32) -> Self {
        self.calibration_poll_limit = calibration;
        self.measurement_poll_limit = measurement;
        self
    }
}
