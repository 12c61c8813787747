use std::process::ExitCode;

use bme280drv::{Bme280, DeviceInfo, DriverConfig};
use log::error;

const DEFAULT_BUS: &str = "/dev/i2c-1";

fn usage() -> ExitCode {
    eprintln!("usage: bme280drv [BUS_PATH] [ALTITUDE_M] [ADDRESS]");
    eprintln!("       defaults: {} 0 0x76", DEFAULT_BUS);
    ExitCode::from(2)
}

fn parse_address(arg: &str) -> Option<u8> {
    match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => arg.parse().ok(),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() > 3 || args.iter().any(|a| a == "-h" || a == "--help") {
        return usage();
    }

    let bus_path = args.first().map(String::as_str).unwrap_or(DEFAULT_BUS);
    let mut config = DriverConfig::default();
    if let Some(altitude) = args.get(1) {
        match altitude.parse() {
            Ok(metres) => config = config.with_station_altitude(metres),
            Err(_) => return usage(),
        }
    }
    if let Some(address) = args.get(2) {
        match parse_address(address) {
            Some(address) => config = config.with_address(address),
            None => return usage(),
        }
    }

    let mut bme = match Bme280::open(bus_path, config) {
        Ok(bme) => bme,
        Err(e) => {
            error!("cannot open {}: {}", bus_path, e);
            return ExitCode::FAILURE;
        }
    };
    if !bme.is_active() {
        error!("{} at {:#04x} is inactive", bme.name(), config.address);
        return ExitCode::FAILURE;
    }

    for index in 0..bme.value_count() as i32 {
        let name = bme.value_name(index).unwrap_or_default();
        match bme.value_at(index) {
            Ok(value) => println!("{}: {}", name, value),
            Err(e) => {
                error!("reading {} failed: {}", name, e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
