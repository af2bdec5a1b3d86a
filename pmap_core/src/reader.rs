use std::io::{Read, Seek, SeekFrom, Write};

use crate::bitmap;
use crate::error::{Error, Result};
use crate::format::{self, BLOCK_SIZE, DECOMPRESS_HINT};
use crate::progress::Progress;
use crate::zlib;

/// Decode a presence-map container from `input`, writing the reconstructed
/// original bytes to `output`. Returns the number of bytes written, which on
/// success equals the header's original length.
///
/// # Decode sequence
/// 1. Read the 8-byte original-length header.
/// 2. Sizing pass: scan the chunk length prefixes without decoding, to bound
///    the loop and size progress reporting.
/// 3. Rewind to the first chunk and decode each in order: decompress, undo
///    the presence-map transform, then **verify** by re-encoding and
///    re-compressing the candidate block and comparing byte-for-byte with
///    the chunk as stored. Any mismatch is a fatal
///    [`Error::Verification`] — no partial output is salvaged, though bytes
///    already written remain in `output`.
/// 4. Write `min(BLOCK_SIZE, remaining)` bytes of each verified block so the
///    final block's zero padding never reaches the output.
pub fn decode<R: Read + Seek, W: Write>(
    mut input: R,
    mut output: W,
    progress: &mut dyn Progress,
) -> Result<u64> {
    let original_len = format::read_header(&mut input)?;

    let chunks_start = input.stream_position()?;
    let chunk_lens = format::scan_chunk_lens(&mut input);
    input.seek(SeekFrom::Start(chunks_start))?;

    let total = chunk_lens.len() as u64;
    let mut written = 0u64;
    for block_idx in 0..total {
        let Some(len) = format::read_chunk_len(&mut input)? else {
            break;
        };
        let mut stored = vec![0u8; len as usize];
        input.read_exact(&mut stored)?;

        let transformed = zlib::decompress(&stored, DECOMPRESS_HINT)?;
        let block = bitmap::decode_block(&transformed);

        // Round-trip self-check: the candidate block must reproduce the
        // stored chunk exactly before we trust it.
        let reencoded = zlib::compress(&bitmap::encode_block(&block))?;
        if reencoded != stored {
            return Err(Error::Verification { block: block_idx });
        }

        let take = (BLOCK_SIZE as u64).min(original_len - written) as usize;
        output.write_all(&block[..take])?;
        written += take as u64;
        progress.update(block_idx + 1, total);
    }

    output.flush()?;
    Ok(written)
}
