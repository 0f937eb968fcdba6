use crate::constants::WORD_MASK;

pub fn bit_mask(bit_position:u32) -> u16 {
    1 << bit_position
}

pub fn with_bit(data:u16, bit_position:u32, on:bool) -> u16 {
    if on {
        data | bit_mask(bit_position)
    } else {
        data & !bit_mask(bit_position)
    }
}

pub fn get_bit(data:u16, bit_position:u32) -> bool {
    data & bit_mask(bit_position) != 0
}

/// Reduces any unsigned value to the word range, e.g. 0x1_0005 becomes 0x0005.
pub fn truncate(value:u32) -> u16 {
    (value & WORD_MASK) as u16
}

/**
 * Splits a cell into its image bytes, high byte first
 * e.g., 0x12FE returns as [0x12, 0xFE]
 */
pub fn split_word(value:u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn join_word(bytes:[u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Sign-extends the low byte, as used by immediate operands and branch displacements.
pub fn sign_extend_byte(value:u16) -> u16 {
    value as u8 as i8 as i16 as u16
}
