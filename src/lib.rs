/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

#![no_std]

use embedded_hal as hal;
use hal::delay::DelayNs;

#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

mod interface;
pub mod units;

pub use interface::{I2cInterface, SensorInterface};

/// Errors in this crate
#[derive(Debug)]
pub enum Error<CommE> {
    /// Sensor communication error
    Comm(CommE),

    /// Unrecognized chip ID
    UnknownChipId,
    /// One-shot conversion did not complete within the polling budget
    NotReady,
}

/// The two I2C addresses selectable via the SA0 pin strap
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlaveAddr {
    /// SA0 high: 25 (0x19)
    Default = 0x19,
    /// SA0 low: 24 (0x18)
    Alternate = 0x18,
}

impl SlaveAddr {
    pub fn addr(self) -> u8 {
        self as u8
    }
}

pub struct Builder {}

impl Builder {
    /// Create a new driver using I2C interface
    pub fn new_i2c<I2C, D, CommE>(
        i2c: I2C,
        address: SlaveAddr,
        delay_source: D,
    ) -> LIS2DW12<I2cInterface<I2C>, D>
    where
        I2C: hal::i2c::I2c<Error = CommE>,
        D: DelayNs,
    {
        let iface = interface::I2cInterface::new(i2c, address.addr());
        LIS2DW12::new_with_interface(iface, delay_source)
    }
}

/// Bounds on how long a one-shot conversion is awaited
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Number of times the trigger bit is checked before giving up
    pub max_polls: u32,
    /// Delay between checks, in microseconds
    pub poll_interval_us: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_polls: 100,
            poll_interval_us: 1000,
        }
    }
}

pub struct LIS2DW12<SI, D> {
    pub(crate) si: SI,
    pub(crate) delay_source: D,

    pub(crate) range: AccelRange,
    pub(crate) one_shot: bool,
    pub(crate) poll_config: PollConfig,
}

impl<SI, D, CommE> LIS2DW12<SI, D>
where
    SI: SensorInterface<InterfaceError = Error<CommE>>,
    D: DelayNs,
{
    pub(crate) fn new_with_interface(sensor_interface: SI, delay_source: D) -> Self {
        Self {
            si: sensor_interface,
            delay_source,
            range: AccelRange::default(),
            one_shot: false,
            poll_config: PollConfig::default(),
        }
    }

    /// Release owned resources
    pub fn release(self) -> (SI, D) {
        (self.si, self.delay_source)
    }

    /// Read the sensor identifier and return true if it matches
    pub fn check_identity(&mut self) -> Result<bool, SI::InterfaceError> {
        let chip_id = self.si.read_u8(REG_WHO_AM_I)?;
        #[cfg(feature = "rttdebug")]
        rprintln!("whoami: 0x{:0x}  ", chip_id);
        Ok(chip_id == LIS2DW12_WAI)
    }

    /// Verify the chip identity, then initialize
    pub fn probe(&mut self) -> Result<(), SI::InterfaceError> {
        if !self.check_identity()? {
            return Err(Error::UnknownChipId);
        }
        self.initialize()
    }

    /// Put the sensor into a known baseline state:
    /// 100 Hz low-power sampling, block data update, continuous conversion, ±2g
    pub fn initialize(&mut self) -> Result<(), SI::InterfaceError> {
        /// ODR = 100 Hz, MODE = low-power, LP_MODE = 2
        const CTRL1_DEFAULT: u8 = 0x51;
        /// BDU | IF_ADD_INC
        const CTRL2_DEFAULT: u8 = 0x0C;
        /// SLP_MODE_SEL: one-shot conversion is triggered through SLP_MODE_1
        const CTRL3_DEFAULT: u8 = 0x02;

        self.si.register_write(REG_CTRL1, CTRL1_DEFAULT)?;
        self.si.register_write(REG_CTRL2, CTRL2_DEFAULT)?;
        self.si.register_write(REG_CTRL3, CTRL3_DEFAULT)?;
        self.set_one_shot_mode(false)?;
        self.set_range(AccelRange::default())?;

        Ok(())
    }

    /// Switch sampling on at the default rate, or into power-down.
    /// While powered down, output registers hold stale data.
    pub fn set_power(&mut self, on: bool) -> Result<(), SI::InterfaceError> {
        let rate = if on {
            DataRate::Hz100
        } else {
            DataRate::PowerDown
        };
        self.set_data_rate(rate)
    }

    /// Set the output data rate (ODR field of CTRL1)
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), SI::InterfaceError> {
        const ODR_KEEP: u8 = 0x0F;
        self.si
            .modify_register(REG_CTRL1, (rate as u8) << 4, ODR_KEEP)
    }

    /// Set the full scale range of the accelerometer.
    /// Samples already latched are not rescaled.
    pub fn set_range(&mut self, range: AccelRange) -> Result<(), SI::InterfaceError> {
        const FS_KEEP: u8 = 0xCF;
        self.si
            .modify_register(REG_CTRL6, (range as u8) << 4, FS_KEEP)?;
        self.range = range;
        Ok(())
    }

    /// Choose between continuous conversion and software-triggered single conversion
    pub fn set_one_shot_mode(&mut self, enabled: bool) -> Result<(), SI::InterfaceError> {
        /// MODE[1:0] = 10: single data conversion on demand
        const MODE_SINGLE: u8 = 0x08;
        const MODE_KEEP: u8 = 0xF3;

        let mode = if enabled { MODE_SINGLE } else { 0 };
        self.si.modify_register(REG_CTRL1, mode, MODE_KEEP)?;
        self.one_shot = enabled;
        Ok(())
    }

    pub fn set_poll_config(&mut self, config: PollConfig) {
        self.poll_config = config;
    }

    /// The range currently used to scale readings
    pub fn range(&self) -> AccelRange {
        self.range
    }

    pub fn one_shot_enabled(&self) -> bool {
        self.one_shot
    }

    /// In one-shot mode, start a conversion and wait for the sensor to
    /// clear the trigger bit. Does nothing in continuous mode.
    fn trigger_one_shot(&mut self) -> Result<(), SI::InterfaceError> {
        /// SLP_MODE_1: set to start a conversion, cleared by the sensor when done
        const SLP_MODE_1: u8 = 0x01;

        if !self.one_shot {
            return Ok(());
        }

        self.si.modify_register(REG_CTRL3, SLP_MODE_1, !SLP_MODE_1)?;

        // Completion is observed on CTRL3, not on the DRDY flag in STATUS (0x27)
        for _ in 0..self.poll_config.max_polls {
            let ctrl3 = self.si.read_u8(REG_CTRL3)?;
            if ctrl3 & SLP_MODE_1 == 0 {
                return Ok(());
            }
            self.delay_source.delay_us(self.poll_config.poll_interval_us);
        }

        #[cfg(feature = "rttdebug")]
        rprintln!("one-shot conversion timed out");
        Err(Error::NotReady)
    }

    /// Read X, Y, Z without any conversion
    pub fn raw_accel(&mut self) -> Result<[i16; 3], SI::InterfaceError> {
        self.trigger_one_shot()?;
        self.si.read_vec3_i16(REG_OUT_X_L)
    }

    /// Read X, Y, Z in milli-g
    pub fn read_all_axes(&mut self) -> Result<[i32; 3], SI::InterfaceError> {
        let raw = self.raw_accel()?;
        Ok([
            units::raw_to_mg(raw[0], self.range),
            units::raw_to_mg(raw[1], self.range),
            units::raw_to_mg(raw[2], self.range),
        ])
    }

    /// Read a single axis, or the combined magnitude, in milli-g
    pub fn acceleration(&mut self, dim: Dimension) -> Result<i32, SI::InterfaceError> {
        let reg = match dim {
            Dimension::X => REG_OUT_X_L,
            Dimension::Y => REG_OUT_Y_L,
            Dimension::Z => REG_OUT_Z_L,
            Dimension::Strength => {
                let [x, y, z] = self.read_all_axes()?;
                return Ok(units::magnitude(x, y, z));
            }
        };

        self.trigger_one_shot()?;
        let raw = self.si.read_i16(reg)?;
        Ok(units::raw_to_mg(raw, self.range))
    }

    /// Read the die temperature
    pub fn temperature(&mut self, unit: TempUnit) -> Result<i32, SI::InterfaceError> {
        self.trigger_one_shot()?;
        // only the high byte carries whole degrees
        let raw = self.si.read_i8(REG_OUT_T_H)?;
        let celsius = units::raw_to_celsius(raw);
        Ok(match unit {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => units::celsius_to_fahrenheit(celsius),
        })
    }
}

/// Register map
///
const REG_OUT_T_L: u8 = 0x0D;
const REG_OUT_T_H: u8 = REG_OUT_T_L + 1;
const REG_WHO_AM_I: u8 = 0x0F;

const REG_CTRL1: u8 = 0x20;
const REG_CTRL2: u8 = 0x21;
const REG_CTRL3: u8 = 0x22;
const REG_CTRL6: u8 = 0x25;

const REG_OUT_X_L: u8 = 0x28;
const REG_OUT_Y_L: u8 = 0x2A;
const REG_OUT_Z_L: u8 = 0x2C;

/// Device ID
const LIS2DW12_WAI: u8 = 0x44;

#[repr(u8)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The accelerometer has a user-programmable full-scale range
/// of ±2g, ±4g, ±8g, and ±16g.
/// The numeric values of these enums correspond to FS[1:0] in CTRL6
pub enum AccelRange {
    /// ±2g
    Range_2g = 0b00,
    /// ±4g
    Range_4g = 0b01,
    /// ±8g
    Range_8g = 0b10,
    /// ±16g
    Range_16g = 0b11,
}

impl Default for AccelRange {
    fn default() -> Self {
        AccelRange::Range_2g
    }
}

impl AccelRange {
    /// Multiplier applied to the ±2g sensitivity: 2^FS
    pub(crate) fn scale_factor(&self) -> f64 {
        f64::from(1u8 << (*self as u8))
    }
}

#[repr(u8)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Output data rate, ODR[3:0] in CTRL1.
/// Rates apply to low-power mode; 1.6 Hz is low-power only.
pub enum DataRate {
    PowerDown = 0b0000,
    Hz1_6 = 0b0001,
    Hz12_5 = 0b0010,
    Hz25 = 0b0011,
    Hz50 = 0b0100,
    Hz100 = 0b0101,
    Hz200 = 0b0110,
    Hz400 = 0b0111,
    Hz800 = 0b1000,
    Hz1600 = 0b1001,
}

/// Which acceleration quantity to read
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    /// Magnitude of the X/Y/Z vector
    Strength,
    X,
    Y,
    Z,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
}
