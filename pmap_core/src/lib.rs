pub mod bitmap;
pub mod error;
pub mod format;
pub mod progress;
pub mod reader;
pub mod writer;
pub mod zlib;

pub use error::{Error, Result};
pub use format::{BLOCK_SIZE, HEADER_SIZE, MAP_BYTES};
pub use progress::{NoProgress, Progress};
pub use reader::decode;
pub use writer::encode;
