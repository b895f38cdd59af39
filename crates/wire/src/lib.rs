//! TCP wire format for single-file transfers.
//!
//! One connection carries exactly one frame. The sender closes the
//! connection after writing; no acknowledgment is read back.
//!
//! # Wire format
//!
//! ```text
//! PER CONNECTION (sender -> receiver), big-endian:
//!   [4 bytes BE: name_len   (i32, > 0)]
//!   [name_len bytes: file name, UTF-8, final path segment only]
//!   [8 bytes BE: file_size  (i64, >= 0)]
//!   [file_size bytes: raw file data]
//! ```
//!
//! No protocol version byte, no magic number, no end marker. The payload
//! is streamed in [`PAYLOAD_CHUNK_SIZE`] chunks so whole files are never
//! held in memory.

pub mod error;
pub mod frame;

pub use error::WireError;
pub use frame::{FrameHeader, read_header, read_payload, write_frame, write_header};

/// Chunk size for streaming file payloads (8 KiB).
pub const PAYLOAD_CHUNK_SIZE: usize = 8 * 1024;
