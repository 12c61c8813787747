use crate::compensation::{convert_humidity, convert_pressure, convert_temperature};
use crate::reading::Reading;
use crate::registers::Register;
use crate::structs::Calibration;

/// Number of values the sensor reports.
pub const NUM_VALUES: usize = 3;

/// One of the three reported values, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pressure = 0,
    Temperature = 1,
    Humidity = 2,
}

/// Calibration, t_fine, raw data word, station altitude.
type Conversion = fn(&Calibration, i32, u32, i32) -> Reading;

// Indexed by `Channel as usize`.
const CONVERSIONS: [Conversion; NUM_VALUES] =
    [convert_pressure, convert_temperature, convert_humidity];

impl Channel {
    pub const ALL: [Channel; NUM_VALUES] =
        [Channel::Pressure, Channel::Temperature, Channel::Humidity];

    /// Channel at a report index; `None` outside `0..3`.
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Pressure => "pressure",
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
        }
    }

    pub fn value_type(self) -> &'static str {
        "float"
    }

    /// First data register and width of the channel's raw word. Temperature
    /// has none of its own: its value comes straight from `t_fine`.
    pub(crate) fn data_register(self) -> Option<(Register, usize)> {
        match self {
            Channel::Pressure => Some((Register::PressMsb, 3)),
            Channel::Temperature => None,
            Channel::Humidity => Some((Register::HumMsb, 2)),
        }
    }

    /// Runs the channel's compensation on a raw data word.
    pub fn convert(
        self,
        calib: &Calibration,
        t_fine: i32,
        raw: u32,
        station_altitude: i32,
    ) -> Reading {
        CONVERSIONS[self.index()](calib, t_fine, raw, station_altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_index(channel.index() as i32), Some(channel));
        }
        assert_eq!(Channel::from_index(-1), None);
        assert_eq!(Channel::from_index(3), None);
        assert_eq!(Channel::from_index(i32::MAX), None);
    }

    #[test]
    fn names_follow_report_order() {
        let names: Vec<_> = Channel::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["pressure", "temperature", "humidity"]);
        assert!(Channel::ALL.iter().all(|c| c.value_type() == "float"));
    }

    #[test]
    fn dispatches_to_the_matching_conversion() {
        let calib = Calibration::default();

        // 0x800000 only means "skipped" to the pressure conversion
        assert!(Channel::Pressure.convert(&calib, 0, 0x80_0000, 0).is_no_data());
        assert_eq!(
            Channel::Temperature.convert(&calib, 128_422, 0x80_0000, 0).to_string(),
            "25.1"
        );
        assert!(Channel::Humidity.convert(&calib, 0, 0x8000, 0).is_no_data());
    }
}
