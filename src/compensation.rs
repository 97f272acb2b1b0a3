//! Floating point compensation of raw ADC codes.
//!
//! The integer algorithm of the data-sheet is rearranged so that every
//! term depending only on the calibration coefficients is computed once.
//! The remaining steps and constants follow the data-sheet approximation
//! and must not be simplified.

use cast::f64;

use crate::{Calibration, Celsius, Oversampling, Pascal};

/// Compensation terms derived from a [`Calibration`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensation {
    tmp0: f64,
    tmp1: f64,
    press0: f64,
    press1: f64,
    press2: f64,
    press3: f64,
    press4: f64,
    ac1: f64,
    ac6: f64,
    md: f64,
}

impl Compensation {
    /// Precalculate the compensation terms.
    pub fn new(coeff: &Calibration) -> Self {
        Compensation {
            // temperature
            tmp0: f64(coeff.ac5()) / 32768.0, // 2^15
            tmp1: f64(coeff.mc()) * 2048.0, // 2^11
            // pressure
            press0: f64(coeff.b2()) / 8388608.0, // 2^23
            press1: f64(coeff.ac2()) / 2048.0, // 2^11
            press2: f64(coeff.ac3()) / 8192.0, // 2^13
            press3: f64(coeff.b1()) / 268435456.0, // 2^28
            press4: f64(coeff.ac4().abs()) / 32768.0,
            ac1: f64(coeff.ac1()),
            ac6: f64(coeff.ac6()),
            md: f64(coeff.md()),
        }
    }

    /// True temperature from the uncompensated temperature `ut`.
    ///
    /// Returns the temperature and the B5 term needed by
    /// [`pressure`](Compensation::pressure).
    pub fn temperature(&self, ut: u16) -> (Celsius, f64) {
        let a = self.tmp0 * (f64(ut) - self.ac6);
        let b = self.tmp1 / (a + self.md);
        let b5 = a + b;
        (6.25e-3 * (a + b + 8.0), b5)
    }

    /// True pressure from the uncompensated pressure `up`, already shifted
    /// by `8 - oss`.
    pub fn pressure(&self, up: u32, b5: f64, oss: Oversampling) -> Pascal {
        let scale = f64(1u32 << oss.value());
        let b6 = b5 - 4000.0;

        // B3
        let x1 = self.press0 * (b6 * b6);
        let x2 = self.press1 * b6;
        let x3 = x1 + x2;
        let b3 = (2.0 + (x3 + 4.0 * self.ac1) * scale) / 4.0;

        // B4
        let x1 = b6 * self.press2;
        let x2 = self.press3 * (b6 * b6);
        let x3 = (2.0 + x1 + x2) / 4.0;
        let b4 = self.press4 * (x3 + 32768.0);

        // B7
        let b7 = (f64(up) - b3) * (50000.0 / scale);

        let p = 2.0 * b7 / b4;
        let x1 = 7.073394953e-7 * (p * p);
        let x2 = -0.1122589111328125 * p;
        p + 6.25e-2 * (x1 + x2 + 3791.0)
    }
}
