//! 80-bit extended-precision sample-rate codec for the AIFF common chunk.
//!
//! AIFF stores the sample rate as an IEEE 754 extended float: a sign bit, a
//! 15-bit biased exponent and a 64-bit mantissa with an explicit integer bit.
//! Only positive integer rates occur in practice, so the codec here covers
//! exactly that range.

const EXPONENT_BIAS: u32 = 16383;

/// Encode a positive integer sample rate into the 10-byte extended field.
///
/// 44100 Hz encodes to `40 0E AC 44 00 00 00 00 00 00`.
pub fn encode_sample_rate(rate: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if rate == 0 {
        return out;
    }

    let exp = 31 - rate.leading_zeros();
    let exponent = (EXPONENT_BIAS + exp) as u16;
    let mantissa = (rate as u64) << (63 - exp);

    out[0..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..10].copy_from_slice(&mantissa.to_be_bytes());
    out
}

/// Decode the 10-byte extended field back into an integer sample rate.
///
/// Returns `None` for negative, fractional-only or out-of-range values.
pub fn decode_sample_rate(bytes: &[u8; 10]) -> Option<u32> {
    let exponent = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mut mantissa_bytes = [0u8; 8];
    mantissa_bytes.copy_from_slice(&bytes[2..10]);
    let mantissa = u64::from_be_bytes(mantissa_bytes);

    if exponent & 0x8000 != 0 {
        return None;
    }
    if mantissa == 0 {
        return (exponent == 0).then_some(0);
    }

    // Right shift that moves the integer part of the mantissa into place.
    let shift = EXPONENT_BIAS as i64 + 63 - exponent as i64;
    if !(0..=63).contains(&shift) {
        return None;
    }

    u32::try_from(mantissa >> shift).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_44100_to_the_reference_bytes() {
        assert_eq!(
            encode_sample_rate(44_100),
            [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn round_trips_common_rates() {
        for rate in [8_000, 16_000, 22_050, 44_100, 48_000, 96_000, 192_000] {
            let bytes = encode_sample_rate(rate);
            assert_eq!(decode_sample_rate(&bytes), Some(rate), "rate {rate}");
        }
    }

    #[test]
    fn zero_rate_is_all_zero_bytes() {
        assert_eq!(encode_sample_rate(0), [0u8; 10]);
        assert_eq!(decode_sample_rate(&[0u8; 10]), Some(0));
    }

    #[test]
    fn rejects_negative_and_oversized_values() {
        let mut negative = encode_sample_rate(44_100);
        negative[0] |= 0x80;
        assert_eq!(decode_sample_rate(&negative), None);

        // Exponent far beyond any integer sample rate.
        let huge = [0x7F, 0xFF, 0x80, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(decode_sample_rate(&huge), None);
    }
}
