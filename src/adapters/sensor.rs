//! ADC adapters.
//!
//! - [`SysfsAdcSensor`] reads a Linux IIO raw channel, e.g.
//!   `/sys/bus/iio/devices/iio:device0/in_voltage0_raw`.
//! - [`SimulatedSensor`] returns a settable constant for host runs and
//!   tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use log::{debug, info};

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::sensors::RawSample;
use crate::sensors::thermistor::ADC_FULL_SCALE;

/// Mid-scale count, about room temperature for the bundled thermistor.
pub const SIMULATED_DEFAULT_RAW: u16 = 512;

/// Linux IIO sysfs channel.
pub struct SysfsAdcSensor {
    path: PathBuf,
}

impl SysfsAdcSensor {
    /// Open the channel.  The file is re-read on every sample.
    pub fn open(path: &Path) -> Result<Self, SensorError> {
        if !path.exists() {
            debug!("ADC channel {} does not exist", path.display());
            return Err(SensorError::AdcReadFailed);
        }
        info!("ADC channel: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// Parse a sysfs raw value, rejecting counts past the converter's full
/// scale.
pub fn parse_raw(text: &str) -> Result<RawSample, SensorError> {
    let raw: u16 = text.trim().parse().map_err(|_| SensorError::Malformed)?;
    if raw > ADC_FULL_SCALE {
        return Err(SensorError::OutOfRange(raw));
    }
    Ok(RawSample(raw))
}

impl SensorPort for SysfsAdcSensor {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            debug!("{}: {e}", self.path.display());
            SensorError::AdcReadFailed
        })?;
        parse_raw(&text)
    }
}

/// Settable constant source.  Clones share the value.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    raw: Arc<AtomicU16>,
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(SIMULATED_DEFAULT_RAW)
    }
}

impl SimulatedSensor {
    pub fn new(raw: u16) -> Self {
        Self {
            raw: Arc::new(AtomicU16::new(raw)),
        }
    }

    pub fn set(&self, raw: u16) {
        self.raw.store(raw, Ordering::Relaxed);
    }
}

impl SensorPort for SimulatedSensor {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        Ok(RawSample(self.raw.load(Ordering::Relaxed)))
    }
}
