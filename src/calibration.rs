use cast::i32;

use crate::{Bmp180Bus, CalibrationError, Error, OutOfRange, Register};

/// Number of calibration coefficients in the BMP180 EEPROM.
pub const NUM_COEFF: usize = 11;

/// Coefficient registers in EEPROM order, AC1 first.
const COEFF_REGISTERS: [Register; NUM_COEFF] = [
    Register::COEFF_AC1,
    Register::COEFF_AC2,
    Register::COEFF_AC3,
    Register::COEFF_AC4,
    Register::COEFF_AC5,
    Register::COEFF_AC6,
    Register::COEFF_B1,
    Register::COEFF_B2,
    Register::COEFF_MB,
    Register::COEFF_MC,
    Register::COEFF_MD,
];

/// Calibration coefficients from the BMP180 EEPROM. These are used to
/// calculate the temperature and the pressure. They are calibrated by
/// the manufacturer, individually for each silicon.
///
/// Index `0..=10` maps to AC1, AC2, AC3, AC4, AC5, AC6, B1, B2, MB, MC, MD.
/// AC4, AC5 and AC6 are unsigned, all other coefficients are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration([i32; NUM_COEFF]);

impl Calibration {
    /// Read all coefficients, one register pair at a time in ascending
    /// address order.
    ///
    /// Fails on the first register holding `0x0000` or `0xFFFF`.
    pub(crate) fn load<B: Bmp180Bus>(bus: &mut B) -> Result<Self, Error<B::Error>> {
        let mut coeff = [0i32; NUM_COEFF];
        for (index, reg) in COEFF_REGISTERS.iter().enumerate() {
            let raw = bus.read_u16(reg.addr()).map_err(Error::Bus)?;
            if raw == 0x0000 || raw == 0xFFFF {
                return Err(CalibrationError {
                    register: reg.addr(),
                    value: raw,
                }
                .into());
            }
            coeff[index] = decode(index, raw);
        }
        Ok(Calibration(coeff))
    }

    /// Coefficient by index.
    pub fn get(&self, index: usize) -> Result<i32, OutOfRange> {
        self.0.get(index).copied().ok_or(OutOfRange {
            value: index,
            max: NUM_COEFF - 1,
        })
    }

    /// All coefficients in EEPROM order.
    pub fn coefficients(&self) -> &[i32; NUM_COEFF] {
        &self.0
    }

    /// AC1
    pub fn ac1(&self) -> i32 {
        self.0[0]
    }

    /// AC2
    pub fn ac2(&self) -> i32 {
        self.0[1]
    }

    /// AC3
    pub fn ac3(&self) -> i32 {
        self.0[2]
    }

    /// AC4
    pub fn ac4(&self) -> i32 {
        self.0[3]
    }

    /// AC5
    pub fn ac5(&self) -> i32 {
        self.0[4]
    }

    /// AC6
    pub fn ac6(&self) -> i32 {
        self.0[5]
    }

    /// B1
    pub fn b1(&self) -> i32 {
        self.0[6]
    }

    /// B2
    pub fn b2(&self) -> i32 {
        self.0[7]
    }

    /// MB
    pub fn mb(&self) -> i32 {
        self.0[8]
    }

    /// MC
    pub fn mc(&self) -> i32 {
        self.0[9]
    }

    /// MD
    pub fn md(&self) -> i32 {
        self.0[10]
    }

    #[cfg(test)]
    pub(crate) fn from_coefficients(coeff: [i32; NUM_COEFF]) -> Self {
        Calibration(coeff)
    }
}

// AC4..AC6 are unsigned shorts, everything else is a signed short
fn decode(index: usize, raw: u16) -> i32 {
    if 2 < index && index < 6 {
        i32(raw)
    } else {
        i32(i16::from_be_bytes(raw.to_be_bytes()))
    }
}
