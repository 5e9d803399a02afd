//! CRC-16/CCITT-FALSE checksum used by the frame codec.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Compute the frame checksum over `data`.
///
/// Polynomial 0x1021, initial register 0xFFFF, MSB-first, no reflection and no
/// final XOR.
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(INITIAL, |crc, &byte| {
        let mut crc = crc ^ (u16::from(byte) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
        crc
    })
}
