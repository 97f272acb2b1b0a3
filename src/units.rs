//! Conversions for compensated pressure readings.

use crate::Pascal;

/// Convert pressure in Pascal to millimetres of mercury (mmHg).
pub fn pa_to_mmhg(p: Pascal) -> f64 {
    p * 7.50062e-3
}

/// Convert pressure from sensor to pressure in hecto Pascal (hPa)
/// relative to normal null.
///
/// # Arguments
///
/// * `p` - Pressure in Pascal
/// * `altitude` - Altitude in Meters
///
#[cfg(feature = "libm")]
pub fn pressure_to_normal_null(p: Pascal, altitude: u16) -> u16 {
    let z = (p as f32) / libm::powf(1f32 - (f32::from(altitude) / 44330f32), 5.255f32);
    libm::roundf(z / 100f32) as u16
}

/// Altitude in meters for pressure `p`, given the pressure `p0` at sea
/// level, both in Pascal.
#[cfg(feature = "libm")]
pub fn altitude(p: Pascal, p0: Pascal) -> f32 {
    44330f32 * (1f32 - libm::powf((p / p0) as f32, 1f32 / 5.255f32))
}
