use core::fmt;

/// BMP180 driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<B> {
    /// Register read or write failed on the bus.
    Bus(B),
    /// A calibration register holds a value that cannot be a valid coefficient.
    Calibration(CalibrationError),
    /// Pressure was requested before any temperature reading.
    ///
    /// The pressure formula needs the B5 term produced by
    /// [`Bmp180::temperature`](crate::Bmp180::temperature).
    Sequence,
    /// An argument was outside of its valid range.
    Range(OutOfRange),
}

impl<B> From<OutOfRange> for Error<B> {
    fn from(e: OutOfRange) -> Self {
        Error::Range(e)
    }
}

impl<B> From<CalibrationError> for Error<B> {
    fn from(e: CalibrationError) -> Self {
        Error::Calibration(e)
    }
}

impl<B: fmt::Debug> fmt::Display for Error<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::Calibration(e) => e.fmt(f),
            Error::Sequence => f.write_str("temperature must be read before pressure"),
            Error::Range(e) => e.fmt(f),
        }
    }
}

/// Invalid calibration coefficient.
///
/// The sensor EEPROM never holds `0x0000` or `0xFFFF` in a calibration
/// register; reading either means the chip or the bus is not working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationError {
    /// Register address of the rejected coefficient.
    pub register: u8,
    /// Raw register value.
    pub value: u16,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid calibration value {:#06x} in register {:#04x}",
            self.value, self.register
        )
    }
}

/// A value outside of the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The rejected value.
    pub value: usize,
    /// Largest accepted value.
    pub max: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value {} out of range 0..={}", self.value, self.max)
    }
}
