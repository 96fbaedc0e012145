// Index image format for the packed trie.
//
// Layout (all integers little-endian):
//
//   0..4    magic "VSPT"
//   4..6    format version
//   6..8    reserved (zero)
//   8..12   node count
//   12..16  word count
//   16..24  fingerprint of the resources the index was built from
//   24..    node table (node count * 32 bytes)
//   ..      word table: per word a u32 byte length followed by UTF-8 bytes

use crate::IndexError;

/// Image magic: the bytes "VSPT".
pub const MAGIC: u32 = u32::from_le_bytes(*b"VSPT");

/// Current image format version.
pub const VERSION: u16 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Offset of the node table (header plus fingerprint).
pub const NODES_OFFSET: usize = HEADER_SIZE + 8;

/// Parsed image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub version: u16,
    pub node_count: u32,
    pub word_count: u32,
}

impl ImageHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.node_count.to_le_bytes());
        buf[12..16].copy_from_slice(&self.word_count.to_le_bytes());
        buf
    }
}

/// Parse and validate the 16-byte image header.
pub fn parse_header(data: &[u8]) -> Result<ImageHeader, IndexError> {
    if data.len() < HEADER_SIZE {
        return Err(IndexError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if read_u32(data, 0) != MAGIC {
        return Err(IndexError::InvalidMagic);
    }
    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != VERSION {
        return Err(IndexError::UnsupportedVersion(version));
    }
    Ok(ImageHeader {
        version,
        node_count: read_u32(data, 8),
        word_count: read_u32(data, 12),
    })
}

/// Read a little-endian u32 at `offset`. The caller checks bounds.
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Incremental FNV-1a hasher used to fingerprint the resources an index
/// image was built from. Not a cryptographic hash; it only has to notice
/// that a dictionary or corpus changed.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn new() -> Self {
        Self(FNV_OFFSET)
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
        // Separator so ("ab", "c") and ("a", "bc") differ
        self.0 ^= 0xff;
        self.0 = self.0.wrapping_mul(FNV_PRIME);
        self
    }

    pub fn finish(&self) -> u64 {
        self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}
