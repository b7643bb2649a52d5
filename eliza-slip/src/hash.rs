/// Deterministic word hash reduced to `bits` bits.
///
/// The word is upper-cased and folded over its UTF-16 code units with the
/// 32-bit `h * 31 + c` recurrence, then masked to `[0, 2^bits)`. Nothing
/// depends on addresses or iteration order, so buckets are stable across
/// runs and platforms.
pub fn hash(word: &str, bits: u32) -> usize {
    let acc = word
        .to_uppercase()
        .encode_utf16()
        .fold(0i32, |acc, unit| {
            acc.wrapping_shl(5)
                .wrapping_sub(acc)
                .wrapping_add(i32::from(unit))
        });
    ((acc as u32) & mask(bits)) as usize
}

fn mask(bits: u32) -> u32 {
    if bits >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
