//! zlib wrapper for one block's transformed bytes.
//!
//! Each chunk is an independent zlib stream compressed at best effort.
//! Decompression is sized by a caller-supplied hint rather than a stored
//! exact length, growing the buffer geometrically until the stream ends.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// Compress `data` as a single zlib stream at maximum effort.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder.finish().map_err(|e| Error::Compression(e.to_string()))
}

/// Decompress a single zlib stream.
///
/// The output buffer starts at `size_hint` capacity; whenever the inflater
/// runs out of output space before reaching stream end, capacity is doubled
/// and inflation resumes. Any other failure is a [`Error::Decompression`].
pub fn decompress(data: &[u8], size_hint: usize) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(size_hint);
    loop {
        let consumed = inflater.total_in() as usize;
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| Error::Decompression(e.to_string()))?;
        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                if out.len() == out.capacity() {
                    out.reserve(out.capacity().max(1));
                } else {
                    // output space left but no progress: the stream is
                    // truncated or corrupt
                    return Err(Error::Decompression(
                        "stream ended before zlib stream end marker".into(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DECOMPRESS_HINT;

    #[test]
    fn roundtrip() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed, DECOMPRESS_HINT).unwrap(), data);
    }

    #[test]
    fn roundtrip_empty() {
        let compressed = compress(&[]).unwrap();
        assert_eq!(decompress(&compressed, DECOMPRESS_HINT).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn grows_past_undersized_hint() {
        let data = vec![0x5Au8; 200_000];
        let compressed = compress(&data).unwrap();
        // a hint of 1 forces repeated doubling before stream end
        assert_eq!(decompress(&compressed, 1).unwrap(), data);
    }

    #[test]
    fn garbage_input_is_a_decompression_error() {
        let err = decompress(&[0x12, 0x34, 0x56, 0x78], 64).unwrap_err();
        assert!(matches!(err, Error::Decompression(_)));
    }

    #[test]
    fn truncated_stream_is_a_decompression_error() {
        let compressed = compress(&vec![7u8; 50_000]).unwrap();
        let err = decompress(&compressed[..compressed.len() / 2], DECOMPRESS_HINT).unwrap_err();
        assert!(matches!(err, Error::Decompression(_)));
    }
}
