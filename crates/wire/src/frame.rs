//! Frame encoding and decoding.
//!
//! The write side is what the sender drives; the read side is the
//! bit-exact contract a receiver must honor, and is what the tests
//! decode with.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::PAYLOAD_CHUNK_SIZE;
use crate::error::WireError;

/// Header of a single-file transfer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// File name (UTF-8, final path segment only).
    pub file_name: String,
    /// Total payload size in bytes.
    pub file_size: i64,
}

/// Writes a frame header to the sink.
pub async fn write_header<W: AsyncWrite + Unpin>(
    writer: &mut W,
    header: &FrameHeader,
) -> Result<(), WireError> {
    let name_bytes = header.file_name.as_bytes();
    if name_bytes.is_empty() {
        return Err(WireError::Protocol("file name is empty".into()));
    }
    let name_len = i32::try_from(name_bytes.len()).map_err(|_| {
        WireError::Protocol(format!(
            "file name too long: {} bytes (max {})",
            name_bytes.len(),
            i32::MAX
        ))
    })?;
    if header.file_size < 0 {
        return Err(WireError::Protocol(format!(
            "negative file size: {}",
            header.file_size
        )));
    }

    writer.write_i32(name_len).await?;
    writer.write_all(name_bytes).await?;
    writer.write_i64(header.file_size).await?;
    Ok(())
}

/// Reads a frame header from the stream.
pub async fn read_header<R: AsyncRead + Unpin>(reader: &mut R) -> Result<FrameHeader, WireError> {
    let name_len = reader.read_i32().await?;
    if name_len <= 0 {
        return Err(WireError::Protocol(format!(
            "invalid name length: {name_len}"
        )));
    }

    let mut name_buf = vec![0u8; name_len as usize];
    reader.read_exact(&mut name_buf).await?;
    let file_name = String::from_utf8(name_buf)
        .map_err(|e| WireError::Protocol(format!("invalid UTF-8 file name: {e}")))?;

    let file_size = reader.read_i64().await?;
    if file_size < 0 {
        return Err(WireError::Protocol(format!(
            "negative file size: {file_size}"
        )));
    }

    Ok(FrameHeader {
        file_name,
        file_size,
    })
}

/// Encodes one complete frame: the header, then exactly
/// `header.file_size` payload bytes streamed from `source` in
/// [`PAYLOAD_CHUNK_SIZE`] chunks, then a flush.
///
/// Either the whole frame reaches the sink or the error left a partial
/// frame behind; a partial frame is corrupt and the connection carrying
/// it must be torn down.
pub async fn write_frame<R, W>(
    writer: &mut W,
    header: &FrameHeader,
    source: &mut R,
) -> Result<(), WireError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_header(writer, header).await?;

    let mut buf = vec![0u8; PAYLOAD_CHUNK_SIZE];
    let mut remaining = header.file_size as u64;

    while remaining > 0 {
        let to_read = (remaining as usize).min(buf.len());
        let n = source.read(&mut buf[..to_read]).await?;
        if n == 0 {
            return Err(WireError::Protocol(
                "unexpected EOF reading source file".into(),
            ));
        }

        writer.write_all(&buf[..n]).await?;
        remaining -= n as u64;
    }

    writer.flush().await?;
    Ok(())
}

/// Copies exactly `file_size` payload bytes from `reader` to `writer`.
///
/// A zero-length payload returns immediately without reading. Running
/// out of stream before `file_size` bytes is a protocol error.
pub async fn read_payload<R, W>(
    reader: &mut R,
    writer: &mut W,
    file_size: i64,
) -> Result<(), WireError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if file_size < 0 {
        return Err(WireError::Protocol(format!(
            "negative file size: {file_size}"
        )));
    }

    let mut buf = vec![0u8; PAYLOAD_CHUNK_SIZE];
    let mut remaining = file_size as u64;

    while remaining > 0 {
        let to_read = (remaining as usize).min(buf.len());
        let n = reader.read(&mut buf[..to_read]).await?;
        if n == 0 {
            return Err(WireError::Protocol(
                "unexpected EOF reading frame payload".into(),
            ));
        }

        writer.write_all(&buf[..n]).await?;
        remaining -= n as u64;
    }

    Ok(())
}
