//! # BME280 driver
//!
//! Brings a Bosch BME280 from power-on to a calibrated state and converts its
//! raw ADC codes into pressure (hPa, reduced to sea level), temperature (°C)
//! and relative humidity (%RH) with the vendor's fixed-point formulas.
//!
//! The bus is abstracted by [`RegisterBus`]. [`I2cBus`] adapts any
//! `embedded-hal` I2C bus; with the `rppal` feature a Raspberry Pi bus can be
//! opened directly with [`Bme280::open`].
//!
//! ```no_run
//! # #[cfg(feature = "rppal")]
//! # fn main() -> Result<(), bme280drv::Error<rppal::i2c::Error>> {
//! use bme280drv::{Bme280, DriverConfig};
//!
//! let config = DriverConfig::default().with_station_altitude(350);
//! let mut bme = Bme280::open("/dev/i2c-1", config)?;
//! for index in 0..3 {
//!     println!("{}", bme.value_at(index)?);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "rppal"))]
//! # fn main() {}
//! ```

pub mod altitude;
pub mod bus;
pub mod channel;
pub mod compensation;
pub mod config;
pub mod device;
pub mod error;
pub mod reading;
pub mod registers;
mod structs;

pub use bus::{I2cBus, RegisterBus};
pub use channel::{Channel, NUM_VALUES};
pub use config::{DriverConfig, Filter, Mode, Oversampling, SamplingConfig, Standby};
pub use device::{Bme280, DeviceInfo, State};
pub use error::Error;
pub use reading::{format_value, Reading, Sample, Unavailable, NO_DATA};
pub use structs::{Calibration, RawData};
