use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::bus::RegisterBus;
use crate::channel::{Channel, NUM_VALUES};
use crate::compensation;
use crate::config::{DriverConfig, Mode, SamplingConfig};
use crate::error::{Error, Result};
use crate::reading::{Reading, Sample, Unavailable};
use crate::registers::{
    Register, CALIB_H_LEN, CALIB_TP_LEN, CHIP_ID, DATA_LEN, SOFT_RESET_CMD, STATUS_IM_UPDATE,
    STATUS_MEASURING,
};
use crate::structs::{Calibration, RawData};

// As per data sheet, startup time is 2 ms.
const STARTUP_DELAY_MS: u32 = 2;
const POLL_INTERVAL_MS: u32 = 1;
// Time given to the first conversion after configuration.
const SETTLE_DELAY_MS: u32 = 100;

/// Initialization progress. Only `Active` devices are queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    IdentityChecked,
    Reset,
    CalibrationReady,
    Active,
    /// Initialization failed; terminal.
    Failed,
}

/// Static description of a device and the values it reports.
pub trait DeviceInfo {
    fn name(&self) -> &'static str;

    fn device_type(&self) -> &'static str;

    fn version(&self) -> &'static str;

    fn value_count(&self) -> usize;

    /// Name of the value at `index`, `None` if there is no such value.
    fn value_name(&self, index: i32) -> Option<&'static str>;

    /// Type of the value at `index`, `None` if there is no such value.
    fn value_type(&self, index: i32) -> Option<&'static str>;
}

/// A BME280 on a register bus.
///
/// Construction runs the whole bring-up sequence: chip id check, soft reset,
/// calibration load, sampling setup and a first temperature baseline. If any
/// step fails the device stays inactive for good and every value request
/// reports "no data" without touching the bus.
///
/// All methods take `&mut self`; one instance owns one bus address.
pub struct Bme280<B: RegisterBus, D> {
    bus: B,
    delay: D,
    config: DriverConfig,
    state: State,
    calibration: Calibration,
    sampling: SamplingConfig,
    t_fine: i32,
    init_error: Option<Error<B::Error>>,
}

impl<B, D> Bme280<B, D>
where
    B: RegisterBus,
    D: DelayNs,
{
    /// Brings the sensor up. Never fails; check [`is_active`](Self::is_active).
    pub fn new(bus: B, delay: D, config: DriverConfig) -> Self {
        let mut device = Bme280 {
            bus,
            delay,
            config,
            state: State::Uninitialized,
            calibration: Calibration::default(),
            sampling: config.sampling,
            t_fine: 0,
            init_error: None,
        };

        match device.initialize() {
            Ok(()) => {
                device.state = State::Active;
                info!(
                    "BME280 active, station altitude {} m",
                    device.config.station_altitude
                );
            }
            Err(e) => {
                error!("BME280 did not initialize. BME280 is inactive: {}", e);
                device.state = State::Failed;
                device.init_error = Some(e);
            }
        }

        device
    }

    fn initialize(&mut self) -> Result<(), B::Error> {
        let found = self.read_byte(Register::Id)?;
        if found != CHIP_ID {
            return Err(Error::ChipIdMismatch {
                found,
                expected: CHIP_ID,
            });
        }
        self.state = State::IdentityChecked;

        // also turns the IIR filter off
        self.write_byte(Register::Reset, SOFT_RESET_CMD)?;
        self.delay.delay_ms(STARTUP_DELAY_MS);
        self.state = State::Reset;

        self.wait_while_status(
            STATUS_IM_UPDATE,
            self.config.calibration_poll_limit,
            "calibration data",
        )?;
        self.calibration = self.read_calibration()?;
        self.state = State::CalibrationReady;
        debug!("BME280 calibration: {:?}", self.calibration);

        self.program_sampling(self.config.sampling)?;
        self.refresh_t_fine()?;
        self.delay.delay_ms(SETTLE_DELAY_MS);

        Ok(())
    }

    fn read_calibration(&mut self) -> Result<Calibration, B::Error> {
        let mut tp = [0u8; CALIB_TP_LEN];
        self.read_bytes(Register::CalibTp, &mut tp)?;

        let mut h = [0u8; CALIB_H_LEN];
        self.read_bytes(Register::CalibH, &mut h)?;

        Ok(Calibration::from_blocks(&tp, &h))
    }

    /// Reprograms oversampling, mode, filter and standby.
    ///
    /// Ignored on an inactive device.
    pub fn set_sampling(&mut self, sampling: SamplingConfig) -> Result<(), B::Error> {
        if !self.is_active() {
            warn!("BME280 is inactive, sampling change ignored");
            return Ok(());
        }
        self.program_sampling(sampling)
    }

    fn program_sampling(&mut self, sampling: SamplingConfig) -> Result<(), B::Error> {
        // ctrl_hum only takes effect once ctrl_meas is written after it
        self.write_byte(Register::CtrlHum, sampling.ctrl_hum())?;
        self.write_byte(Register::Config, sampling.config())?;
        self.write_byte(Register::CtrlMeas, sampling.ctrl_meas())?;
        self.sampling = sampling;

        info!("BME280 sampling set to {:?}", sampling);
        Ok(())
    }

    /// In forced mode, starts one conversion and waits for it to finish.
    /// Does nothing in the other modes.
    fn take_forced_measurement(&mut self) -> Result<(), B::Error> {
        if self.sampling.mode != Mode::Forced {
            return Ok(());
        }

        self.write_byte(Register::CtrlMeas, self.sampling.ctrl_meas())?;
        self.wait_while_status(
            STATUS_MEASURING,
            self.config.measurement_poll_limit,
            "forced measurement",
        )
    }

    fn wait_while_status(
        &mut self,
        mask: u8,
        limit: u32,
        operation: &'static str,
    ) -> Result<(), B::Error> {
        let mut attempts = 0;
        loop {
            if (self.read_byte(Register::Status)? & mask) == 0 {
                return Ok(());
            }
            if attempts >= limit {
                return Err(Error::Timeout {
                    operation,
                    attempts,
                });
            }
            self.delay.delay_ms(POLL_INTERVAL_MS);
            attempts += 1;
        }
    }

    fn refresh_t_fine(&mut self) -> Result<(), B::Error> {
        let adc_t = self.read_word(Register::TempMsb, 3)? >> 4;
        self.t_fine = compensation::t_fine(&self.calibration, adc_t as i32);
        debug!("BME280 adc_T {} t_fine {}", adc_t, self.t_fine);
        Ok(())
    }

    /// Big-endian word of `len` (at most 3) consecutive data registers.
    fn read_word(&mut self, register: Register, len: usize) -> Result<u32, B::Error> {
        let mut buffer = [0u8; 3];
        let bytes = &mut buffer[..len];
        self.read_bytes(register, bytes)?;
        Ok(bytes
            .iter()
            .fold(0u32, |word, &b| (word << 8) | u32::from(b)))
    }

    /// Reads one value, recomputing `t_fine` first.
    pub fn read(&mut self, channel: Channel) -> Result<Reading, B::Error> {
        if !self.is_active() {
            return Ok(Reading::NoData(Unavailable::Inactive));
        }

        self.take_forced_measurement()?;
        self.refresh_t_fine()?;

        let raw = match channel.data_register() {
            Some((register, len)) => self.read_word(register, len)?,
            None => 0,
        };

        let reading = channel.convert(
            &self.calibration,
            self.t_fine,
            raw,
            self.config.station_altitude,
        );
        self.log_reading(channel, raw, &reading);

        Ok(reading)
    }

    /// Reads all three values from one burst, sharing one `t_fine`.
    pub fn sample(&mut self) -> Result<Sample, B::Error> {
        if !self.is_active() {
            return Ok(Sample::unavailable(Unavailable::Inactive));
        }

        self.take_forced_measurement()?;

        let mut data = [0u8; DATA_LEN];
        self.read_bytes(Register::PressMsb, &mut data)?;
        let raw = RawData::from_burst(&data);

        self.t_fine = compensation::t_fine(&self.calibration, (raw.temperature >> 4) as i32);

        let convert = |channel: Channel, word: u32| {
            channel.convert(
                &self.calibration,
                self.t_fine,
                word,
                self.config.station_altitude,
            )
        };
        let sample = Sample {
            pressure: convert(Channel::Pressure, raw.pressure),
            temperature: convert(Channel::Temperature, raw.temperature),
            humidity: convert(Channel::Humidity, raw.humidity),
        };
        self.log_reading(Channel::Pressure, raw.pressure, &sample.pressure);
        self.log_reading(Channel::Humidity, raw.humidity, &sample.humidity);

        Ok(sample)
    }

    fn log_reading(&self, channel: Channel, raw: u32, reading: &Reading) {
        match reading {
            Reading::Degenerate => {
                warn!("BME280 {} compensation divided by zero, reporting 0", channel.name())
            }
            Reading::NoData(reason) => {
                debug!("BME280 {} unavailable ({:?}), raw {:#x}", channel.name(), reason, raw)
            }
            Reading::Value { .. } => {}
        }
    }

    /// Reading at report index `index`.
    ///
    /// Indices outside `0..3` and inactive devices never reach the bus.
    pub fn reading_at(&mut self, index: i32) -> Result<Reading, B::Error> {
        match Channel::from_index(index) {
            Some(channel) => self.read(channel),
            None => Ok(Reading::NoData(Unavailable::InvalidIndex)),
        }
    }

    /// Formatted value at report index `index`, or "no data".
    pub fn value_at(&mut self, index: i32) -> Result<String, B::Error> {
        Ok(self.reading_at(index)?.to_string())
    }

    fn read_byte(&mut self, register: Register) -> Result<u8, B::Error> {
        self.bus.read_byte(register.addr()).map_err(Error::Bus)
    }

    fn read_bytes(&mut self, register: Register, buffer: &mut [u8]) -> Result<(), B::Error> {
        self.bus.read_bytes(register.addr(), buffer).map_err(Error::Bus)
    }

    fn write_byte(&mut self, register: Register, value: u8) -> Result<(), B::Error> {
        self.bus.write_byte(register.addr(), value).map_err(Error::Bus)
    }
}

impl<B: RegisterBus, D> Bme280<B, D> {
    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Why initialization failed, if it did.
    pub fn init_error(&self) -> Option<&Error<B::Error>> {
        self.init_error.as_ref()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    pub fn station_altitude(&self) -> i32 {
        self.config.station_altitude
    }

    /// Temperature baseline from the most recent conversion.
    pub fn t_fine(&self) -> i32 {
        self.t_fine
    }

    /// Gives back the bus and the delay provider.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

impl<B: RegisterBus, D> DeviceInfo for Bme280<B, D> {
    fn name(&self) -> &'static str {
        "BME280"
    }

    fn device_type(&self) -> &'static str {
        "sensor"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn value_count(&self) -> usize {
        NUM_VALUES
    }

    fn value_name(&self, index: i32) -> Option<&'static str> {
        Channel::from_index(index).map(Channel::name)
    }

    fn value_type(&self, index: i32) -> Option<&'static str> {
        Channel::from_index(index).map(Channel::value_type)
    }
}

#[cfg(feature = "rppal")]
impl Bme280<rppal::i2c::I2c, rppal::hal::Delay> {
    /// Opens a Linux I2C bus (`/dev/i2c-N`) and brings the sensor up at
    /// `config.address`.
    ///
    /// # Errors
    /// Only failures to open the bus are returned; initialization failures
    /// leave the returned device inactive.
    pub fn open(bus_path: &str, config: DriverConfig) -> Result<Self, rppal::i2c::Error> {
        let bus = crate::bus::bus_number(bus_path)
            .ok_or_else(|| Error::InvalidBusPath(bus_path.to_owned()))?;

        let mut i2c = rppal::i2c::I2c::with_bus(bus).map_err(Error::Bus)?;
        i2c.set_slave_address(u16::from(config.address))
            .map_err(Error::Bus)?;

        Ok(Bme280::new(i2c, rppal::hal::Delay::new(), config))
    }
}
