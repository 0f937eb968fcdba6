pub const WORD_BITS:u32 = 16;
pub const WORD_MASK:u32 = (1 << WORD_BITS) - 1;
pub const SIGN_BIT:u32 = 7; // top bit of the 8-bit data portion
pub const BYTES_PER_CELL:usize = 2;

pub const DEFAULT_MEMORY_SIZE:usize = 2048; // cells, addresses 0x000-0x7FF

// program state register
// x = reserved
// ... P    W   INT EI  x   N   Z   V   C
//     8    7   6   5   4   3   2   1   0
pub const CARRY_BIT:u32 = 0;
pub const OVERFLOW_BIT:u32 = 1;
pub const ZERO_BIT:u32 = 2;
pub const SIGN_FLAG_BIT:u32 = 3;
pub const ALLOW_INTERRUPTION_BIT:u32 = 5;
pub const INTERRUPTION_BIT:u32 = 6;
pub const RUNNING_BIT:u32 = 7;
pub const PARITY_BIT:u32 = 8;
