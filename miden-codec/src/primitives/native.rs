use super::sealed::Sealed;

// NATIVE NUMERICS
// ================================================================================================

/// A numeric value transferred as its raw bit pattern.
///
/// The wire format is the native representation of the value with its byte order canonicalized
/// to big-endian. No canonicalization of NaN payloads or subnormals takes place, so every bit
/// pattern survives a round trip.
pub trait NativeBits: Copy + Sealed {
    /// Byte array holding the encoded value.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Returns the bit pattern of `self` in big-endian byte order.
    fn to_wire_bytes(self) -> Self::Bytes;

    /// Rebuilds a value from a big-endian bit pattern.
    fn from_wire_bytes(bytes: Self::Bytes) -> Self;
}

impl NativeBits for f32 {
    type Bytes = [u8; 4];

    #[inline]
    fn to_wire_bytes(self) -> Self::Bytes {
        self.to_bits().to_be_bytes()
    }

    #[inline]
    fn from_wire_bytes(bytes: Self::Bytes) -> Self {
        f32::from_bits(u32::from_be_bytes(bytes))
    }
}

impl NativeBits for f64 {
    type Bytes = [u8; 8];

    #[inline]
    fn to_wire_bytes(self) -> Self::Bytes {
        self.to_bits().to_be_bytes()
    }

    #[inline]
    fn from_wire_bytes(bytes: Self::Bytes) -> Self {
        f64::from_bits(u64::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_are_big_endian() {
        assert_eq!(1.0f32.to_wire_bytes(), [0x3f, 0x80, 0x00, 0x00]);
        assert_eq!((-2.5f64).to_wire_bytes(), [0xc0, 0x04, 0, 0, 0, 0, 0, 0]);
        assert_eq!(f32::from_wire_bytes([0x3f, 0x80, 0x00, 0x00]), 1.0);
    }

    #[test]
    fn bit_patterns_are_preserved() {
        // quiet NaN with a payload, negative zero and the smallest subnormal
        for bits in [0x7fc0_1234u32, 0x8000_0000, 0x0000_0001] {
            let value = f32::from_bits(bits);
            assert_eq!(f32::from_wire_bytes(value.to_wire_bytes()).to_bits(), bits);
        }

        let bits = 0xfff8_0000_dead_beefu64;
        let value = f64::from_bits(bits);
        assert_eq!(f64::from_wire_bytes(value.to_wire_bytes()).to_bits(), bits);
    }
}
