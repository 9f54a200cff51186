//! Wire framing for voicelink connections.
//!
//! Every application message travels as one frame over the TCP stream:
//!
//! ```text
//! +------+-------------------+---------------------+
//! | kind | len (u32)         | payload (len bytes) |
//! | 1 B  | big-endian        |                     |
//! +------+-------------------+---------------------+
//! ```
//!
//! Kind `0x01` is a text frame, `0x02` a binary frame. One read yields
//! exactly one complete message; the payload is never split or merged
//! across frames. A zero-length payload is legal.

use bytes::Bytes;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frame kind byte for text frames
pub const KIND_TEXT: u8 = 0x01;

/// Frame kind byte for binary frames
pub const KIND_BINARY: u8 = 0x02;

/// Fixed header size in bytes: kind(1) + len(4)
pub const HEADER_LEN: usize = 5;

/// The kind of payload a frame carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 text (commands and responses)
    Text,
    /// Raw bytes (audio uploads)
    Binary,
}

impl FrameKind {
    fn to_byte(self) -> u8 {
        match self {
            FrameKind::Text => KIND_TEXT,
            FrameKind::Binary => KIND_BINARY,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KIND_TEXT => Some(FrameKind::Text),
            KIND_BINARY => Some(FrameKind::Binary),
            _ => None,
        }
    }
}

/// One complete application message
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    pub payload: Bytes,
}

/// Framing errors
#[derive(Debug)]
pub enum FrameError {
    /// Underlying stream error, including EOF mid-frame
    Io(io::Error),
    /// Kind byte is not one of the defined values
    UnknownKind(u8),
    /// Declared payload length exceeds the configured maximum
    TooLarge { len: usize, max: usize },
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "frame I/O error: {}", e),
            FrameError::UnknownKind(b) => write!(f, "unknown frame kind byte: 0x{:02X}", b),
            FrameError::TooLarge { len, max } => {
                write!(f, "frame payload of {} bytes exceeds maximum of {}", len, max)
            }
        }
    }
}

impl std::error::Error for FrameError {}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

/// Read one complete frame from the stream.
///
/// Returns `Ok(None)` on a clean close, i.e. EOF arriving exactly at a
/// frame boundary. EOF inside a header or payload is an I/O error.
/// Payloads longer than `max_len` are rejected without being read.
pub async fn read_frame<R>(stream: &mut R, max_len: usize) -> Result<Option<Frame>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut kind_byte = [0u8; 1];
    // A zero-byte read here means the peer closed between messages.
    let n = stream.read(&mut kind_byte).await?;
    if n == 0 {
        return Ok(None);
    }

    let kind = match FrameKind::from_byte(kind_byte[0]) {
        Some(kind) => kind,
        None => return Err(FrameError::UnknownKind(kind_byte[0])),
    };

    let mut len_bytes = [0u8; 4];
    stream.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes) as usize;

    if len > max_len {
        return Err(FrameError::TooLarge { len, max: max_len });
    }

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await?;

    Ok(Some(Frame {
        kind,
        payload: Bytes::from(payload),
    }))
}

/// Write one frame to the stream.
pub async fn write_frame<W>(stream: &mut W, kind: FrameKind, payload: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    header[0] = kind.to_byte();
    header[1..5].copy_from_slice(&(payload.len() as u32).to_be_bytes());

    stream.write_all(&header).await?;
    stream.write_all(payload).await?;
    stream.flush().await
}
