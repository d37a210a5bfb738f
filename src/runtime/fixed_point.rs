use std::fmt;

/// 16-bit fixed-point value as sent by the devices: integer part in the high
/// byte, tenths in the low byte (`0x2005` is 32.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FixedPoint16(u16);

impl FixedPoint16 {
    pub const fn from_raw(raw: u16) -> Self {
        FixedPoint16(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn integer(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn fraction(self) -> u8 {
        (self.0 & 0x00ff) as u8
    }

    /// Nearest representable value; saturates outside `0.0..=255.9`.
    pub fn from_f64(value: f64) -> Self {
        let mut integer = value.trunc() as u8;
        let mut tenths = ((value - f64::from(integer)) * 10.0).round() as u8;
        if tenths >= 10 {
            if integer == u8::MAX {
                tenths = 9;
            } else {
                integer += 1;
                tenths = 0;
            }
        }
        FixedPoint16((u16::from(integer) << 8) | u16::from(tenths))
    }

    pub fn to_f64(self) -> f64 {
        f64::from(self.integer()) + 0.1 * f64::from(self.fraction())
    }
}

impl fmt::Display for FixedPoint16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.integer(), self.fraction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_integer_and_tenths() {
        let fx = FixedPoint16::from_raw(0x2005);
        assert_eq!(fx.integer(), 32);
        assert_eq!(fx.fraction(), 5);
        assert!((fx.to_f64() - 32.5).abs() < 1e-9);
        assert_eq!(fx.to_string(), "32.5");
    }

    #[test]
    fn from_f64_rounds_to_tenths() {
        assert_eq!(FixedPoint16::from_f64(32.5).raw(), 0x2005);
        assert_eq!(FixedPoint16::from_f64(25.04).raw(), 0x1900);
        assert_eq!(FixedPoint16::from_f64(29.96).raw(), 0x1e00);
    }

    #[test]
    fn from_f64_saturates() {
        assert_eq!(FixedPoint16::from_f64(-3.0).raw(), 0x0000);
        assert_eq!(FixedPoint16::from_f64(1000.0).raw(), 0xff09);
        assert_eq!(FixedPoint16::from_f64(255.97).raw(), 0xff09);
    }
}
