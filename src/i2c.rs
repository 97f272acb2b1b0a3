use hal::blocking::i2c::{Write, WriteRead};

/// BMP180 I²C address.
// The LSB of the device address distinguishes between read (1) and
// write (0) operation, corresponding to address 0xEF (read) and 0xEE
// (write). Note: embedded-hal/blocking/i2c uses 7-bit addresses.
#[allow(clippy::unreadable_literal)]
pub const DEFAULT_ADDRESS: u8 = 0b1110111;

/// BMP180 bus on an `embedded-hal` blocking I²C peripheral.
#[derive(Debug)]
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> I2cBus<I2C>
where
    I2C: WriteRead<Error = E> + Write<Error = E>,
{
    /// Creates a bus at the default address `0x77`.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Creates a bus at a 7-bit `address`.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        I2cBus { i2c, address }
    }

    /// 7-bit device address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Free the I²C peripheral.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> crate::Bmp180Bus for I2cBus<I2C>
where
    I2C: WriteRead<Error = E> + Write<Error = E>,
{
    type Error = E;

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(self.address, &[reg], buf)
    }

    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), E> {
        self.i2c.write(self.address, &[reg, data])
    }
}
