//! A platform agnostic driver to interface the BOSCH BMP180 sensor
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! The BMP180 only supports single-shot conversions. A measurement is
//! started with [`Bmp180::start_measurement`], the result is read after
//! the conversion time has passed (see [`Bmp180::conversion_time`]) or
//! once [`Bmp180::is_data_ready`] reports the conversion as finished.
//! The driver never blocks or sleeps, waiting is left to the caller.
//!
//! Pressure compensation depends on the last temperature reading, so
//! temperature has to be read at least once before pressure.
//!
//! # Example
//!
//! ```
//! # use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
//! # let coeff: [u16; 11] = [
//! #     408, 0xFFB8, 0xC7D1, 32741, 32757, 23153, 6190, 4, 0x8000, 0xDDF9, 2868,
//! # ];
//! # let mut expectations: Vec<_> = coeff
//! #     .iter()
//! #     .enumerate()
//! #     .map(|(i, c)| I2cTransaction::write_read(0x77, vec![0xAA + 2 * i as u8], c.to_be_bytes().to_vec()))
//! #     .collect();
//! # expectations.extend_from_slice(&[
//! #     I2cTransaction::write(0x77, vec![0xF4, 0x2E]),
//! #     I2cTransaction::write_read(0x77, vec![0xF4], vec![0x0E]),
//! #     I2cTransaction::write_read(0x77, vec![0xF6], vec![0x6C, 0xFA]),
//! # ]);
//! # let i2c = I2cMock::new(&expectations);
//! use bmp180_driver::{Bmp180, Measurement, Oversampling, Reading};
//!
//! let mut bmp = Bmp180::from_i2c(i2c, Oversampling::UltraLowPower).unwrap();
//! bmp.start_measurement(Measurement::Temperature).unwrap();
//! // wait for bmp.conversion_time()
//! match bmp.poll().unwrap() {
//!     Some(Reading::Temperature(t)) => assert!((t - 15.0).abs() < 0.1),
//!     _ => unreachable!(),
//! }
//! # bmp.free().free().done();
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/0.2

#![no_std]
#![deny(missing_docs)]
#![allow(clippy::trivially_copy_pass_by_ref)]

#[cfg(test)]
#[macro_use]
extern crate std;

use core::convert::TryFrom;
use core::time::Duration;

use generic_array::typenum::consts::{U1, U3};
use generic_array::GenericArray;
use log::{debug, trace};

mod bus;
mod calibration;
mod compensation;
mod error;
/// BMP180 I²C bus implementation with embedded-hal version 0.2
pub mod i2c;
pub mod units;

pub use crate::bus::Bmp180Bus;
pub use crate::calibration::{Calibration, NUM_COEFF};
pub use crate::compensation::Compensation;
pub use crate::error::{CalibrationError, Error, OutOfRange};

/// BMP180 chip ID.
pub const CHIP_ID: u8 = 0x55;

const RESET_MAGIC: u8 = 0xB6;

/// Start-Of-Conversion bit of the control register, set while a
/// conversion is running.
const SCO: u8 = 0b0010_0000;

/// BMP180 registers
#[allow(non_camel_case_types)]
#[derive(Copy, Clone)]
pub(crate) enum Register {
    COEFF_AC1 = 0xAA,
    COEFF_AC2 = 0xAC,
    COEFF_AC3 = 0xAE,
    COEFF_AC4 = 0xB0,
    COEFF_AC5 = 0xB2,
    COEFF_AC6 = 0xB4,
    COEFF_B1 = 0xB6,
    COEFF_B2 = 0xB8,
    COEFF_MB = 0xBA,
    COEFF_MC = 0xBC,
    COEFF_MD = 0xBE,
    CHIP_ID = 0xD0,
    SOFT_RESET = 0xE0,
    /// Control register
    CONTROL_REG = 0xF4,
    /// First value register, next is 0xF7, 0xF8
    VALUE_REG = 0xF6,
}

impl Register {
    pub fn addr(&self) -> u8 {
        *self as u8
    }
}

/// Oversampling modes, pressure only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Oversampling {
    /// Number of samples 1, conversion time max 4.5ms, average current 3µA
    UltraLowPower = 0,
    /// Number of samples 2, conversion time max 7.5ms, average current 5µA
    Standard = 1,
    /// Number of samples 4, conversion time max 13.5ms, average current 7µA
    HighResolution = 2,
    /// Number of samples 8, conversion time max. 25.5ms, average current 12µA
    UltraHighResolution = 3,
}

impl Oversampling {
    /// Raw oversampling setting, `0..=3`.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Time to wait after starting a pressure conversion.
    pub const fn conversion_time(&self) -> Duration {
        match self {
            Oversampling::UltraLowPower => Duration::from_millis(5),
            Oversampling::Standard => Duration::from_millis(8),
            Oversampling::HighResolution => Duration::from_millis(14),
            Oversampling::UltraHighResolution => Duration::from_millis(26),
        }
    }
}

impl Default for Oversampling {
    fn default() -> Self {
        Oversampling::UltraHighResolution
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = OutOfRange;

    fn try_from(oss: u8) -> Result<Self, Self::Error> {
        match oss {
            0 => Ok(Oversampling::UltraLowPower),
            1 => Ok(Oversampling::Standard),
            2 => Ok(Oversampling::HighResolution),
            3 => Ok(Oversampling::UltraHighResolution),
            _ => Err(OutOfRange {
                value: oss.into(),
                max: 3,
            }),
        }
    }
}

impl From<Oversampling> for u8 {
    fn from(oss: Oversampling) -> Self {
        oss.value()
    }
}

/// Physical quantity to convert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Measurement {
    /// Temperature, always converted without oversampling.
    Temperature,
    /// Pressure, converted with the configured oversampling.
    Pressure,
}

impl Measurement {
    /// Control register value starting this conversion.
    ///
    /// Bits 7:6 hold the oversampling, bit 5 starts the conversion and
    /// bits 4:0 select the quantity.
    pub fn control_value(&self, oss: Oversampling) -> u8 {
        match self {
            Measurement::Temperature => SCO | 0x0E,
            Measurement::Pressure => (oss.value() << 6) | SCO | 0x14,
        }
    }

    /// Time to wait after starting this conversion.
    pub fn conversion_time(&self, oss: Oversampling) -> Duration {
        match self {
            Measurement::Temperature => Oversampling::UltraLowPower.conversion_time(),
            Measurement::Pressure => oss.conversion_time(),
        }
    }
}

/// Control register, as read back from the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Status(u8);

impl Status {
    /// `true` while a conversion is running.
    pub const fn converting(&self) -> bool {
        self.0 & SCO != 0
    }

    /// `true` once the result registers hold the finished conversion.
    pub const fn is_ready(&self) -> bool {
        !self.converting()
    }

    /// Raw register value.
    pub const fn raw(&self) -> u8 {
        self.0
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> Self {
        s.0
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Status")
            .field("converting", &self.converting())
            .field("raw", &self.0)
            .finish()
    }
}

/// Temperature in degree Celsius (℃)
pub type Celsius = f64;

/// Pressure in Pascal (Pa)
pub type Pascal = f64;

/// A compensated reading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Reading {
    /// Temperature in degree Celsius.
    Temperature(Celsius),
    /// Pressure in Pascal relative to the location of the sensor.
    /// Note that meteorological pressures are given relative to
    /// normal null sea level in order to be location independent. The
    /// function [`units::pressure_to_normal_null`] can be used to convert
    /// the location pressure to normal null.
    Pressure(Pascal),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Pending(Measurement),
}

/// BMP180 driver
#[derive(Debug)]
pub struct Bmp180<B> {
    bus: B,
    coeff: Calibration,
    comp: Compensation,
    oss: Oversampling,
    requested: Measurement,
    state: State,
    b5: Option<f64>,
}

impl<I2C, E> Bmp180<i2c::I2cBus<I2C>>
where
    I2C: hal::blocking::i2c::WriteRead<Error = E> + hal::blocking::i2c::Write<Error = E>,
{
    /// Create a new driver from a I2C peripheral at the default address
    /// with given oversampling settings.
    pub fn from_i2c(i2c: I2C, oss: Oversampling) -> Result<Self, Error<E>> {
        Self::new(i2c::I2cBus::new(i2c), oss)
    }
}

impl<B> Bmp180<B>
where
    B: Bmp180Bus,
{
    /// Create a new driver on `bus` with given oversampling settings.
    ///
    /// Reads the calibration coefficients from the sensor EEPROM.
    pub fn new(mut bus: B, oss: Oversampling) -> Result<Self, Error<B::Error>> {
        let coeff = Calibration::load(&mut bus)?;
        debug!("BMP180 calibration {:?}", coeff.coefficients());
        let comp = Compensation::new(&coeff);

        Ok(Bmp180 {
            bus,
            coeff,
            comp,
            oss,
            requested: Measurement::Temperature,
            state: State::Idle,
            b5: None,
        })
    }

    /// Free the bus from the driver.
    pub fn free(self) -> B {
        self.bus
    }

    /// Read the chip ID, [`CHIP_ID`] for a BMP180.
    pub fn chip_id(&mut self) -> Result<u8, Error<B::Error>> {
        let buf: GenericArray<u8, U1> = self.read_register(Register::CHIP_ID)?;
        Ok(buf[0])
    }

    /// Soft reset, same sequence as power on reset.
    pub fn soft_reset(&mut self) -> Result<(), Error<B::Error>> {
        debug!("BMP180 soft reset");
        self.write_register(Register::SOFT_RESET, RESET_MAGIC)
    }

    /// Calibration coefficients read at construction.
    pub fn calibration(&self) -> &Calibration {
        &self.coeff
    }

    /// Calibration coefficient by index `0..=10`.
    pub fn calibration_coefficient(&self, index: usize) -> Result<i32, Error<B::Error>> {
        Ok(self.coeff.get(index)?)
    }

    /// Current oversampling setting.
    pub fn oversampling(&self) -> Oversampling {
        self.oss
    }

    /// Change the oversampling setting used for the next pressure
    /// conversion.
    pub fn set_oversampling(&mut self, oss: Oversampling) {
        self.oss = oss;
    }

    /// Change the oversampling setting from its raw value `0..=3`.
    ///
    /// Out of range values leave the current setting untouched.
    pub fn try_set_oversampling(&mut self, oss: u8) -> Result<(), Error<B::Error>> {
        self.oss = Oversampling::try_from(oss)?;
        Ok(())
    }

    /// Start a conversion.
    ///
    /// Starting a conversion while another one is running restarts the
    /// conversion on the sensor. Temperature is always converted without
    /// oversampling; the configured setting is not changed by that.
    pub fn start_measurement(&mut self, kind: Measurement) -> Result<(), Error<B::Error>> {
        let value = kind.control_value(self.oss);
        trace!("BMP180 start {:?}, control {:#04x}", kind, value);
        self.write_register(Register::CONTROL_REG, value)?;
        self.requested = kind;
        self.state = State::Pending(kind);
        Ok(())
    }

    /// Quantity of the last started conversion.
    pub fn measurement(&self) -> Measurement {
        self.requested
    }

    /// `true` between [`start_measurement`](Bmp180::start_measurement) and
    /// the reading returned by [`poll`](Bmp180::poll).
    pub fn is_pending(&self) -> bool {
        self.state != State::Idle
    }

    /// Time to wait after starting a conversion of the last requested
    /// quantity with the current oversampling setting.
    pub fn conversion_time(&self) -> Duration {
        self.requested.conversion_time(self.oss)
    }

    /// Read the control register.
    pub fn data_status(&mut self) -> Result<Status, Error<B::Error>> {
        let buf: GenericArray<u8, U1> = self.read_register(Register::CONTROL_REG)?;
        Ok(Status(buf[0]))
    }

    /// `true` if no conversion is running and the result can be read.
    pub fn is_data_ready(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.data_status()?.is_ready())
    }

    /// Read the result of a temperature conversion.
    pub fn temperature(&mut self) -> Result<Celsius, Error<B::Error>> {
        let ut = self
            .bus
            .read_u16(Register::VALUE_REG.addr())
            .map_err(Error::Bus)?;
        trace!("BMP180 UT {}", ut);
        let (t, b5) = self.comp.temperature(ut);
        // Value b5 is used in pressure calculation
        self.b5 = Some(b5);
        Ok(t)
    }

    /// Read the result of a pressure conversion.
    ///
    /// Fails with [`Error::Sequence`] unless [`temperature`](Bmp180::temperature)
    /// has been read before.
    pub fn pressure(&mut self) -> Result<Pascal, Error<B::Error>> {
        let b5 = self.b5.ok_or(Error::Sequence)?;
        let up: GenericArray<u8, U3> = self.read_register(Register::VALUE_REG)?;
        let up = ((u32::from(up[0]) << 16) | (u32::from(up[1]) << 8) | u32::from(up[2]))
            >> (8 - self.oss.value());
        trace!("BMP180 UP {}", up);
        Ok(self.comp.pressure(up, b5, self.oss))
    }

    /// Probe for the result of the pending conversion.
    ///
    /// Returns `None` if no conversion was started or the conversion is
    /// still running. Otherwise reads and returns the result; further
    /// calls return `None` until the next
    /// [`start_measurement`](Bmp180::start_measurement).
    pub fn poll(&mut self) -> Result<Option<Reading>, Error<B::Error>> {
        let kind = match self.state {
            State::Idle => return Ok(None),
            State::Pending(kind) => kind,
        };
        if !self.is_data_ready()? {
            return Ok(None);
        }
        let reading = match kind {
            Measurement::Temperature => Reading::Temperature(self.temperature()?),
            Measurement::Pressure => Reading::Pressure(self.pressure()?),
        };
        self.state = State::Idle;
        Ok(Some(reading))
    }

    /// Endless iterator over [`poll`](Bmp180::poll).
    pub fn readings(&mut self) -> Readings<'_, B> {
        Readings { bmp: self }
    }

    fn read_register<N>(&mut self, reg: Register) -> Result<GenericArray<u8, N>, Error<B::Error>>
    where
        N: generic_array::ArrayLength<u8>,
    {
        self.bus.read_array(reg.addr()).map_err(Error::Bus)
    }

    fn write_register(&mut self, reg: Register, byte: u8) -> Result<(), Error<B::Error>> {
        self.bus.write_reg(reg.addr(), byte).map_err(Error::Bus)
    }
}

/// Iterator polling a [`Bmp180`] for results, see [`Bmp180::readings`].
///
/// Never ends; `Ok(None)` items mean no result is available yet.
#[derive(Debug)]
pub struct Readings<'a, B> {
    bmp: &'a mut Bmp180<B>,
}

impl<'a, B> Readings<'a, B>
where
    B: Bmp180Bus,
{
    /// Start the next conversion without releasing the driver.
    pub fn start_measurement(&mut self, kind: Measurement) -> Result<(), Error<B::Error>> {
        self.bmp.start_measurement(kind)
    }
}

impl<'a, B> Iterator for Readings<'a, B>
where
    B: Bmp180Bus,
{
    type Item = Result<Option<Reading>, Error<B::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.bmp.poll())
    }
}
