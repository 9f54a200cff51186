//! Command parser and response generator for the voicelink protocol.
//!
//! One frame carries one command. Text commands are whitespace-tokenized;
//! the first token selects the command (exact, case-sensitive). The AUDIO
//! command is special-cased before tokenization: a message beginning with
//! the 6-byte literal `"AUDIO "` carries the raw payload bytes verbatim
//! after the prefix, which may not be valid UTF-8 and is never tokenized.
//!
//! Commands:
//! - `REGISTER <username> <password>`
//! - `LOGIN <username> <password>`
//! - `AUDIO <raw bytes>`

use bytes::Bytes;
use std::str;

/// Literal prefix marking an audio upload, trailing space included
pub const AUDIO_PREFIX: &[u8] = b"AUDIO ";

/// Parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new user record
    Register { username: String, password: String },

    /// Check credentials against the store
    Login { username: String, password: String },

    /// Persist a voice message payload
    Audio { payload: Bytes },

    /// Anything not matching a known command
    Unknown,
}

/// Decode one message into a command.
///
/// Never fails: a message that does not match a known command shape decodes
/// to [`Command::Unknown`]. A message shorter than the `"AUDIO "` prefix
/// cannot be an audio upload and falls through to tokenized parsing, so no
/// slice ever goes out of bounds. Missing REGISTER/LOGIN arguments decode
/// as empty strings.
pub fn parse(message: &Bytes) -> Command {
    // Binary-safe check first: everything after the prefix is payload.
    if message.len() >= AUDIO_PREFIX.len() && message.starts_with(AUDIO_PREFIX) {
        return Command::Audio {
            payload: message.slice(AUDIO_PREFIX.len()..),
        };
    }

    // Anything else must be a text command.
    let text = match str::from_utf8(message) {
        Ok(s) => s,
        Err(_) => return Command::Unknown,
    };

    let mut tokens = text.split_whitespace();
    let command = match tokens.next() {
        Some(c) => c,
        None => return Command::Unknown,
    };

    match command {
        "REGISTER" => Command::Register {
            username: tokens.next().unwrap_or_default().to_string(),
            password: tokens.next().unwrap_or_default().to_string(),
        },
        "LOGIN" => Command::Login {
            username: tokens.next().unwrap_or_default().to_string(),
            password: tokens.next().unwrap_or_default().to_string(),
        },
        _ => Command::Unknown,
    }
}

/// Response generator for the voicelink protocol
pub struct Response;

impl Response {
    pub fn register_success() -> &'static str {
        "REGISTER_SUCCESS"
    }

    pub fn register_fail() -> &'static str {
        "REGISTER_FAIL Username already exists"
    }

    pub fn login_success() -> &'static str {
        "LOGIN_SUCCESS OpenChatWindow"
    }

    pub fn login_fail() -> &'static str {
        "LOGIN_FAIL Invalid username or password"
    }

    pub fn audio_success() -> &'static str {
        "AUDIO_SUCCESS"
    }

    pub fn unknown_command() -> &'static str {
        "UNKNOWN_COMMAND"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_bytes(bytes: &[u8]) -> Command {
        parse(&Bytes::copy_from_slice(bytes))
    }

    #[test]
    fn test_parse_register() {
        match parse_bytes(b"REGISTER alice secret") {
            Command::Register { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "secret");
            }
            other => panic!("Expected Register, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_login() {
        match parse_bytes(b"LOGIN alice secret") {
            Command::Login { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "secret");
            }
            other => panic!("Expected Login, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_register_missing_args() {
        // Missing tokens decode as empty strings, matching the original
        // stream-extraction behavior.
        match parse_bytes(b"REGISTER alice") {
            Command::Register { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "");
            }
            other => panic!("Expected Register, got {:?}", other),
        }

        match parse_bytes(b"REGISTER") {
            Command::Register { username, password } => {
                assert_eq!(username, "");
                assert_eq!(password, "");
            }
            other => panic!("Expected Register, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_extra_tokens_ignored() {
        match parse_bytes(b"LOGIN alice secret trailing junk") {
            Command::Login { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "secret");
            }
            other => panic!("Expected Login, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_audio() {
        let mut message = b"AUDIO ".to_vec();
        let pcm: Vec<u8> = vec![0x00, 0xFF, 0x7F, 0x80, 0x01];
        message.extend_from_slice(&pcm);

        match parse_bytes(&message) {
            Command::Audio { payload } => assert_eq!(&payload[..], &pcm[..]),
            other => panic!("Expected Audio, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_audio_empty_payload() {
        match parse_bytes(b"AUDIO ") {
            Command::Audio { payload } => assert!(payload.is_empty()),
            other => panic!("Expected Audio, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_audio_payload_not_tokenized() {
        match parse_bytes(b"AUDIO  two  spaces ") {
            Command::Audio { payload } => assert_eq!(&payload[..], b" two  spaces "),
            other => panic!("Expected Audio, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_short_prefix_is_unknown() {
        // Shorter than the prefix must not slice out of range.
        assert_eq!(parse_bytes(b"AUD"), Command::Unknown);
        assert_eq!(parse_bytes(b"AUDIO"), Command::Unknown);
        assert_eq!(parse_bytes(b"A"), Command::Unknown);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(parse_bytes(b"DELETE alice"), Command::Unknown);
        assert_eq!(parse_bytes(b"register alice secret"), Command::Unknown);
        assert_eq!(parse_bytes(b"LOGOUT"), Command::Unknown);
    }

    #[test]
    fn test_parse_empty_message() {
        assert_eq!(parse_bytes(b""), Command::Unknown);
        assert_eq!(parse_bytes(b"   "), Command::Unknown);
    }

    #[test]
    fn test_parse_invalid_utf8_is_unknown() {
        assert_eq!(parse_bytes(&[0xFF, 0xFE, 0x00]), Command::Unknown);
    }

    #[test]
    fn test_leading_whitespace_register() {
        // split_whitespace skips leading whitespace; the command token
        // still matches.
        match parse_bytes(b"  REGISTER alice secret") {
            Command::Register { username, .. } => assert_eq!(username, "alice"),
            other => panic!("Expected Register, got {:?}", other),
        }
    }
}
