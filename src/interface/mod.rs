pub mod i2c;

pub use self::i2c::I2cInterface;

/// A method of communicating with the sensor
pub trait SensorInterface {
    /// Interface error type
    type InterfaceError;

    /// Write a single configuration byte
    fn register_write(&mut self, reg: u8, val: u8) -> Result<(), Self::InterfaceError>;

    /// Read a single register byte, addressed without the auto-increment bit
    fn register_read(&mut self, reg: u8) -> Result<u8, Self::InterfaceError>;

    /// Read consecutive registers starting at `reg`, with auto-increment enabled
    fn read_block(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::InterfaceError>;

    fn read_u8(&mut self, reg: u8) -> Result<u8, Self::InterfaceError> {
        self.register_read(reg)
    }

    fn read_i8(&mut self, reg: u8) -> Result<i8, Self::InterfaceError> {
        Ok(self.register_read(reg)? as i8)
    }

    /// Read a little-endian unsigned 16-bit value
    fn read_u16(&mut self, reg: u8) -> Result<u16, Self::InterfaceError> {
        let mut block: [u8; 2] = [0; 2];
        self.read_block(reg, &mut block)?;
        Ok(u16::from_le_bytes(block))
    }

    /// Read a little-endian signed 16-bit value
    fn read_i16(&mut self, reg: u8) -> Result<i16, Self::InterfaceError> {
        let mut block: [u8; 2] = [0; 2];
        self.read_block(reg, &mut block)?;
        Ok(i16::from_le_bytes(block))
    }

    /// Read three consecutive little-endian i16 values (X, Y, Z)
    fn read_vec3_i16(&mut self, reg: u8) -> Result<[i16; 3], Self::InterfaceError> {
        let mut block: [u8; 6] = [0; 6];
        self.read_block(reg, &mut block)?;

        Ok([
            i16::from_le_bytes([block[0], block[1]]),
            i16::from_le_bytes([block[2], block[3]]),
            i16::from_le_bytes([block[4], block[5]]),
        ])
    }

    /// Read-modify-write: bits set in `mask` are kept, then `value` is OR'd in.
    /// The register ends up as `(current & mask) | value`.
    fn modify_register(&mut self, reg: u8, value: u8, mask: u8) -> Result<(), Self::InterfaceError> {
        let current = self.register_read(reg)?;
        self.register_write(reg, (current & mask) | value)
    }
}
