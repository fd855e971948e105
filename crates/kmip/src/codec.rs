//! Length-prefixed framing for decoded protocol messages.
//!
//! Wire-format encoding proper is the transport layer's concern; this codec
//! carries already-typed messages between peers that agree on the serde
//! encoding, which is what the server and the bundled client do. Frames are
//! a big-endian `u32` length followed by the bincode body.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames larger than this are rejected before any allocation. The largest
/// legitimate message is a Register batch carrying a 256-bit key, so the cap
/// only bounds what a misbehaving peer can make the server allocate.
pub const MAX_FRAME_LEN: u32 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    /// The peer closed the connection between messages.
    #[error("connection closed")]
    Closed,
    #[error("frame of {0} bytes exceeds the {MAX_FRAME_LEN} byte limit")]
    FrameTooLarge(u32),
    #[error("malformed message: {0}")]
    Malformed(#[from] bincode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads one framed message. EOF on the length prefix is a clean close;
/// EOF inside the body surfaces as an I/O error.
pub async fn read_message<M, R>(reader: &mut R) -> Result<M, CodecError>
where
    M: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32().await {
        Ok(len) => len,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(CodecError::Closed),
        Err(e) => return Err(e.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(len));
    }
    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;
    Ok(bincode::deserialize(&body)?)
}

/// Writes one framed message and flushes.
pub async fn write_message<M, W>(writer: &mut W, message: &M) -> Result<(), CodecError>
where
    M: Serialize,
    W: AsyncWrite + Unpin,
{
    let body = bincode::serialize(message)?;
    let len = u32::try_from(body.len()).map_err(|_| CodecError::FrameTooLarge(u32::MAX))?;
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(len));
    }
    writer.write_u32(len).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}
