//! CRC-16/CCITT-FALSE checksum.
//!
//! Polynomial: 0x1021, Initial: 0xFFFF, No reflection, No final XOR

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Checksum of `payload` as 4 uppercase hex digits, the form used by tag 63.
pub fn checksum(payload: &str) -> String {
    format!("{:04X}", crc16(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn crc16_empty_is_initial_register() {
        assert_eq!(crc16(&[]), 0xFFFF);
        assert_eq!(checksum(""), "FFFF");
    }

    #[test]
    fn checksum_is_uppercase_hex() {
        assert_eq!(crc16(b"000201"), 0x89B9);
        assert_eq!(checksum("000201"), "89B9");
    }

    #[test]
    fn checksum_is_zero_padded() {
        assert_eq!(crc16(b"B4"), 0x0076);
        assert_eq!(checksum("B4"), "0076");
    }
}
