use cast::u16;
use generic_array::{ArrayLength, GenericArray};

/// Register access to a BMP180.
///
/// The driver only talks to the sensor through this trait. An
/// implementation owns the transport and the device address; see
/// [`I2cBus`](crate::i2c::I2cBus) for the `embedded-hal` implementation.
pub trait Bmp180Bus {
    /// Bus error.
    type Error;

    /// Read `buf.len()` consecutive registers starting at `reg`.
    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write a single register.
    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), Self::Error>;

    /// Read `N` consecutive registers starting at `reg`.
    fn read_array<N>(&mut self, reg: u8) -> Result<GenericArray<u8, N>, Self::Error>
    where
        N: ArrayLength<u8>,
    {
        let mut buf: GenericArray<u8, N> = GenericArray::default();
        self.read_regs(reg, &mut buf)?;
        Ok(buf)
    }

    /// Read a big-endian 16 bit value, MSB at `reg`, LSB at `reg + 1`.
    fn read_u16(&mut self, reg: u8) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.read_regs(reg, &mut buf)?;
        Ok((u16(buf[0]) << 8) | u16(buf[1]))
    }
}
