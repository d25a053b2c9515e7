//! Byte parity lookup.

/// `PARITY[b]` is 1 when `b` has an odd number of set bits.
pub(crate) static PARITY: [u8; 256] = build_parity_table();

const fn build_parity_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value = 0usize;
    while value < 256 {
        let mut bits = value;
        let mut parity = 0u8;
        while bits != 0 {
            parity ^= 1;
            bits &= bits - 1;
        }
        table[value] = parity;
        value += 1;
    }
    table
}

/// XOR-parity of a packed byte slice.
#[inline]
pub(crate) fn parity_of(bytes: &[u8]) -> bool {
    bytes.iter().fold(0u8, |acc, &b| acc ^ PARITY[b as usize]) == 1
}
