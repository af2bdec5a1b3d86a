use std::io::{self, Read, Seek, SeekFrom, Write};

/// Raw bytes per block — the unit of transform and compression.
/// The last block of a file is zero-padded up to this size.
pub const BLOCK_SIZE: usize = 4096;

/// Bytes per presence bitmap: one bit per block position.
pub const MAP_BYTES: usize = BLOCK_SIZE / 8;

/// Bytes per transform entry: value byte + bitmap.
pub const ENTRY_SIZE: usize = 1 + MAP_BYTES;

/// Fixed size of the container header in bytes: original_length:u64.
pub const HEADER_SIZE: usize = 8;

/// Size of each chunk's length prefix in bytes.
pub const CHUNK_LEN_SIZE: usize = 4;

/// Initial buffer capacity for decompressing one chunk. A generous multiple
/// of BLOCK_SIZE rather than a stored exact size; [`crate::zlib::decompress`]
/// doubles it as needed.
pub const DECOMPRESS_HINT: usize = 8 * BLOCK_SIZE;

// ── Container layout ────────────────────────────────────────────────────────
//
// [8 bytes]  original_length  (u64 LE)
// repeat until end of stream:
//   [4 bytes] chunk_length    (u32 LE)
//   [chunk_length bytes] compressed payload
//
// Every multi-byte field is little-endian. The reference format mixed a
// big-endian header with little-endian chunk lengths; this implementation
// standardizes on little-endian throughout and is therefore not
// bit-compatible with containers written by the reference tool.

/// Write the 8-byte container header holding the original file length.
pub fn write_header<W: Write>(w: &mut W, original_len: u64) -> io::Result<()> {
    w.write_all(&original_len.to_le_bytes())
}

/// Read the 8-byte container header back.
pub fn read_header<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; HEADER_SIZE];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Write one length-prefixed chunk: u32 LE payload length, then the payload.
pub fn write_chunk<W: Write>(w: &mut W, payload: &[u8]) -> io::Result<()> {
    w.write_all(&(payload.len() as u32).to_le_bytes())?;
    w.write_all(payload)
}

/// Read the next chunk's length prefix.
///
/// Returns `Ok(None)` once the stream ends — either cleanly at a chunk
/// boundary or with a truncated (< 4 byte) prefix, which callers treat the
/// same way: no further chunks.
pub fn read_chunk_len<R: Read>(r: &mut R) -> io::Result<Option<u32>> {
    let mut buf = [0u8; CHUNK_LEN_SIZE];
    match r.read_exact(&mut buf) {
        Ok(()) => Ok(Some(u32::from_le_bytes(buf))),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Sizing pass over the chunk list.
///
/// Starting at the reader's current position (immediately after the header),
/// read each length prefix and seek over its payload without decoding. Stops
/// silently on any failed read, keeping whatever lengths were already
/// gathered. The caller rewinds to the starting offset before the decode
/// pass; the lengths only size progress reporting and bound the decode loop.
pub fn scan_chunk_lens<R: Read + Seek>(r: &mut R) -> Vec<u32> {
    let mut lens = Vec::new();
    loop {
        match read_chunk_len(r) {
            Ok(Some(len)) => {
                lens.push(len);
                if r.seek(SeekFrom::Current(i64::from(len))).is_err() {
                    break;
                }
            }
            Ok(None) | Err(_) => break,
        }
    }
    lens
}
