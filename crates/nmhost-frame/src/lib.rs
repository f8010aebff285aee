//! Native messaging framing over stdio.
//!
//! Every message exchanged with the browser is framed as:
//! - A 4-byte little-endian payload length
//! - Exactly that many payload bytes (UTF-8 JSON in practice)
//!
//! Byte order and prefix width are fixed by the browser's native messaging protocol.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
