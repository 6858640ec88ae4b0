//! NTC thermistor model (100 kOhm @ 25 C, B = 4275).
//!
//! Grove temperature sensor v1.2 wiring: the thermistor sits in a divider
//! against a fixed resistor equal to `R0` and is read through a 10-bit ADC.
//! The simplified Beta (Steinhart-Hart) equation converts resistance to
//! temperature.
//!
//! The divider ratio `ADC_FULL_SCALE / raw - 1` is undefined at `raw == 0`
//! and the logarithm is undefined at `raw == ADC_FULL_SCALE`; both ends yield
//! `None` instead of a NaN or infinity.

/// Largest count the 10-bit ADC can return.
pub const ADC_FULL_SCALE: u16 = 1023;

/// Beta coefficient of the thermistor material.
pub const BETA: f64 = 4275.0;

/// Nominal resistance at `T0_K`, in ohms.
pub const R0_OHMS: f64 = 100_000.0;

/// Reference temperature for `R0_OHMS` (25 C), in kelvin.
pub const T0_K: f64 = 298.15;

const KELVIN_OFFSET: f64 = 273.15;

/// Material constants for a Beta-model NTC thermistor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermistorModel {
    pub beta: f64,
    pub r0_ohms: f64,
    pub t0_k: f64,
    pub full_scale: u16,
}

impl ThermistorModel {
    /// The part fitted to the reference board.
    pub const GROVE_V1_2: Self = Self {
        beta: BETA,
        r0_ohms: R0_OHMS,
        t0_k: T0_K,
        full_scale: ADC_FULL_SCALE,
    };

    /// Whether `raw` lies strictly inside the divider's defined range.
    pub fn in_domain(&self, raw: u16) -> bool {
        raw > 0 && raw < self.full_scale
    }

    /// Thermistor resistance implied by `raw`, in ohms.
    pub fn resistance(&self, raw: u16) -> Option<f64> {
        if !self.in_domain(raw) {
            return None;
        }
        Some((f64::from(self.full_scale) / f64::from(raw) - 1.0) * self.r0_ohms)
    }

    /// Temperature in degrees Celsius, or `None` outside the domain.
    pub fn celsius(&self, raw: u16) -> Option<f64> {
        let r = self.resistance(raw)?;
        let inv_t = (r / self.r0_ohms).ln() / self.beta + 1.0 / self.t0_k;
        if inv_t <= 0.0 {
            return None;
        }
        let celsius = 1.0 / inv_t - KELVIN_OFFSET;
        celsius.is_finite().then_some(celsius)
    }
}

impl Default for ThermistorModel {
    fn default() -> Self {
        Self::GROVE_V1_2
    }
}
