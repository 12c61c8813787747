use thiserror::Error;

/// Errors raised while talking to the sensor.
///
/// `E` is the error type of the underlying [`RegisterBus`](crate::RegisterBus).
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The transport failed; the in-progress operation was abandoned.
    #[error("bus transfer failed: {0:?}")]
    Bus(E),
    /// The `id` register did not hold the BME280 chip id.
    #[error("unexpected chip id {found:#04x}, expected {expected:#04x}")]
    ChipIdMismatch { found: u8, expected: u8 },
    /// A status bit did not clear within the configured number of polls.
    #[error("timed out waiting for {operation} after {attempts} polls")]
    Timeout {
        operation: &'static str,
        attempts: u32,
    },
    /// No I2C bus number could be derived from the given device path.
    #[error("invalid bus path {0:?}")]
    InvalidBusPath(String),
}

/// Result type alias for driver operations.
pub type Result<T, E> = core::result::Result<T, Error<E>>;
