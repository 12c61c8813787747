use core::fmt;

use crate::channel::Channel;

/// Text reported for any value that is not available.
pub const NO_DATA: &str = "no data";

/// Why a reading carries no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// The device failed initialization and is no longer queried.
    Inactive,
    /// The requested value index does not exist.
    InvalidIndex,
    /// The channel's oversampling is set to skipped.
    ChannelDisabled,
    /// The sea-level pressure fell outside the plausible band.
    OutOfRange,
}

/// Outcome of one value request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// A compensated value and the number of decimals it is reported with.
    Value { value: f32, precision: usize },
    /// The pressure formula hit a zero divisor. Reported as `0`, which
    /// cannot be told apart from a real reading in text form.
    Degenerate,
    NoData(Unavailable),
}

impl Reading {
    pub fn value(value: f32, precision: usize) -> Self {
        Reading::Value { value, precision }
    }

    /// The compensated value, if there is one.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Reading::Value { value, .. } => Some(value),
            Reading::Degenerate => Some(0.0),
            Reading::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Reading::NoData(_))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reading::Value { value, precision } => f.write_str(&format_value(value, precision)),
            Reading::Degenerate => f.write_str("0"),
            Reading::NoData(_) => f.write_str(NO_DATA),
        }
    }
}

/// All three readings from one measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub pressure: Reading,
    pub temperature: Reading,
    pub humidity: Reading,
}

impl Sample {
    pub(crate) fn unavailable(reason: Unavailable) -> Self {
        Sample {
            pressure: Reading::NoData(reason),
            temperature: Reading::NoData(reason),
            humidity: Reading::NoData(reason),
        }
    }

    pub fn get(&self, channel: Channel) -> Reading {
        match channel {
            Channel::Pressure => self.pressure,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }
}

/// Formats `value` with a fixed number of decimals.
pub fn format_value(value: f32, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_fixed_decimals() {
        assert_eq!(format_value(1013.256, 2), "1013.26");
        assert_eq!(format_value(21.04, 1), "21.0");
        assert_eq!(format_value(-3.0, 1), "-3.0");
    }

    #[test]
    fn display_of_each_outcome() {
        assert_eq!(Reading::value(45.67, 1).to_string(), "45.7");
        assert_eq!(Reading::Degenerate.to_string(), "0");
        assert_eq!(Reading::NoData(Unavailable::OutOfRange).to_string(), NO_DATA);
    }

    #[test]
    fn sample_lookup_by_channel() {
        let sample = Sample {
            pressure: Reading::value(1000.0, 2),
            temperature: Reading::value(20.0, 1),
            humidity: Reading::NoData(Unavailable::ChannelDisabled),
        };

        assert_eq!(sample.get(Channel::Pressure).to_string(), "1000.00");
        assert_eq!(sample.get(Channel::Temperature).to_string(), "20.0");
        assert!(sample.get(Channel::Humidity).is_no_data());
        assert!(Channel::ALL
            .iter()
            .all(|&c| Sample::unavailable(Unavailable::Inactive).get(c).is_no_data()));
    }

    #[test]
    fn degenerate_still_reads_as_zero() {
        assert_eq!(Reading::Degenerate.as_f32(), Some(0.0));
        assert_eq!(Reading::NoData(Unavailable::Inactive).as_f32(), None);
        assert!(Reading::NoData(Unavailable::InvalidIndex).is_no_data());
        assert!(!Reading::Degenerate.is_no_data());
    }
}
