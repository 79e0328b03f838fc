//! Conversion of raw register values into physical units

use crate::AccelRange;

/// Sensitivity at ±2g, in milli-g per LSB
const BASE_SENSITIVITY_MG: f64 = 0.061;

/// The temperature register encodes the delta from this reference
const TEMPERATURE_OFFSET_C: i32 = 25;

/// Round to nearest, halves toward positive infinity
fn round_half_up(val: f64) -> i32 {
    libm::floor(val + 0.5) as i32
}

/// Convert a raw acceleration sample to milli-g at the given range
pub fn raw_to_mg(raw: i16, range: AccelRange) -> i32 {
    round_half_up(f64::from(raw) * BASE_SENSITIVITY_MG * range.scale_factor())
}

/// Euclidean norm of three milli-g readings
pub fn magnitude(x: i32, y: i32, z: i32) -> i32 {
    let (x, y, z) = (f64::from(x), f64::from(y), f64::from(z));
    round_half_up(libm::sqrt(x * x + y * y + z * z))
}

/// Convert the signed temperature high byte to degrees Celsius
pub fn raw_to_celsius(raw: i8) -> i32 {
    i32::from(raw) + TEMPERATURE_OFFSET_C
}

pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    round_half_up(32.0 + f64::from(celsius) * 9.0 / 5.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_doubles_per_range_step() {
        assert_eq!(raw_to_mg(1000, AccelRange::Range_2g), 61);
        assert_eq!(raw_to_mg(1000, AccelRange::Range_4g), 122);
        assert_eq!(raw_to_mg(1000, AccelRange::Range_8g), 244);
        assert_eq!(raw_to_mg(1000, AccelRange::Range_16g), 488);
    }

    #[test]
    fn extremes_and_negatives() {
        assert_eq!(raw_to_mg(0, AccelRange::Range_16g), 0);
        assert_eq!(raw_to_mg(-1000, AccelRange::Range_2g), -61);
        // 32767 * 0.061 = 1998.787
        assert_eq!(raw_to_mg(i16::MAX, AccelRange::Range_2g), 1999);
        // -32768 * 0.061 * 8 = -15990.784
        assert_eq!(raw_to_mg(i16::MIN, AccelRange::Range_16g), -15991);
    }

    #[test]
    fn rounds_to_nearest() {
        // 10 * 0.061 = 0.61
        assert_eq!(raw_to_mg(10, AccelRange::Range_2g), 1);
        // 8 * 0.061 = 0.488
        assert_eq!(raw_to_mg(8, AccelRange::Range_2g), 0);
        // -10 * 0.061 = -0.61
        assert_eq!(raw_to_mg(-10, AccelRange::Range_2g), -1);
    }

    #[test]
    fn magnitude_of_axes() {
        assert_eq!(magnitude(3, 4, 0), 5);
        assert_eq!(magnitude(0, 0, -1000), 1000);
        // sqrt(61^2 * 3) = 105.655
        assert_eq!(magnitude(61, 61, 61), 106);
        assert_eq!(magnitude(0, 0, 0), 0);
    }

    #[test]
    fn temperature_units() {
        assert_eq!(raw_to_celsius(20), 45);
        assert_eq!(celsius_to_fahrenheit(45), 113);
        assert_eq!(raw_to_celsius(-25), 0);
        assert_eq!(celsius_to_fahrenheit(0), 32);
        assert_eq!(raw_to_celsius(-128), -103);
        // 32 + 26 * 1.8 = 78.8
        assert_eq!(celsius_to_fahrenheit(26), 79);
    }
}
