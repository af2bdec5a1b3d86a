use std::io::{self, Read, Write};

use crate::bitmap;
use crate::error::Result;
use crate::format::{self, BLOCK_SIZE};
use crate::progress::Progress;
use crate::zlib;

/// Encode `input` into a presence-map container on `output`.
///
/// Writes the 8-byte header holding `input_len`, then one compressed chunk
/// per `BLOCK_SIZE` block of input, zero-padding the final block. `input`
/// must yield exactly `input_len` bytes. Returns the number of blocks
/// written; empty input produces a header-only container.
///
/// Strictly sequential: blocks are read, transformed, compressed, and
/// appended in file order, and any failure aborts the whole run.
pub fn encode<R: Read, W: Write>(
    mut input: R,
    input_len: u64,
    mut output: W,
    progress: &mut dyn Progress,
) -> Result<u64> {
    format::write_header(&mut output, input_len)?;

    let total = input_len.div_ceil(BLOCK_SIZE as u64);
    let mut block = [0u8; BLOCK_SIZE];
    for done in 1..=total {
        let filled = read_full(&mut input, &mut block)?;
        block[filled..].fill(0);

        let transformed = bitmap::encode_block(&block);
        let compressed = zlib::compress(&transformed)?;
        format::write_chunk(&mut output, &compressed)?;
        progress.update(done, total);
    }

    output.flush()?;
    Ok(total)
}

/// Fill as much of `buf` as the reader can provide, returning the count.
/// Only the final block of a file comes back short.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
