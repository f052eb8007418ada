//! Identifier Hashing
//!
//! Puzzle content is chosen by hashing the puzzle's identifier into a
//! fixed catalog, so a given id always maps to the same challenge on
//! every session and every server without any stored assignment table.
//!
//! The hash is CRC-32 (IEEE, reflected polynomial 0xEDB88320), kept
//! bit-compatible with the checksum the browser client computes when it
//! previews puzzle text offline.

/// CRC-32 (IEEE) of a byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Map an identifier onto an index into a table of `table_len` entries.
///
/// Pure function of its inputs. Returns 0 for an empty table so callers
/// can index a guaranteed-nonempty fallback instead of panicking.
pub fn table_index(id: &str, table_len: usize) -> usize {
    if table_len == 0 {
        return 0;
    }
    crc32(id.as_bytes()) as usize % table_len
}

// =============================================================================
// TESTS
// =============================================================================
