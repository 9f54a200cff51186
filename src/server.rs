//! TCP server for handling voicelink connections.
//!
//! Accepts connections, runs one session per connection, and dispatches
//! decoded commands against the credential store and the audio sink.

use crate::audio::AudioSink;
use crate::config::Config;
use crate::frame::{self, FrameError, FrameKind};
use crate::protocol::{self, Command, Response};
use crate::store::CredentialStore;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace, warn};

/// Server instance
pub struct Server {
    config: Config,
    users: Arc<CredentialStore>,
    audio: Arc<AudioSink>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        let users = CredentialStore::new();
        let audio = Arc::new(AudioSink::new(config.audio_path.clone()));

        Server {
            config,
            users,
            audio,
        }
    }

    /// Start the server and begin accepting connections.
    ///
    /// Failing to bind the listening address is the only fatal error; all
    /// per-connection failures are logged and acceptance continues. Every
    /// accepted connection gets its own session task with no connection
    /// cap and no idle timeout.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(&self.config.listen).await?;
        info!(address = %self.config.listen, "Server listening");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(peer = %addr, "New connection");

                    let users = Arc::clone(&self.users);
                    let audio = Arc::clone(&self.audio);
                    let max_frame_len = self.config.max_frame_len;

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, users, audio, max_frame_len).await
                        {
                            debug!(peer = %addr, error = %e, "Session ended with error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    /// Get a reference to the credential store for testing
    #[cfg(test)]
    pub fn users(&self) -> &Arc<CredentialStore> {
        &self.users
    }
}

/// Run one session: read a frame, dispatch it, write the response, repeat.
///
/// Reads and writes alternate strictly; a new read is never issued before
/// the previous response write has completed. Clean close ends the session
/// without error. Response write failures are logged and the session keeps
/// reading (best-effort delivery); read and framing failures end the
/// session.
pub async fn handle_connection<S>(
    mut stream: S,
    users: Arc<CredentialStore>,
    audio: Arc<AudioSink>,
    max_frame_len: usize,
) -> Result<(), FrameError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let frame = match frame::read_frame(&mut stream, max_frame_len).await? {
            Some(frame) => frame,
            None => {
                trace!("Connection closed by client");
                return Ok(());
            }
        };

        let command = protocol::parse(&frame.payload);
        trace!(?command, "Processing command");

        let response = execute_command(&command, &users, &audio).await;

        // Responses are always text frames.
        if let Err(e) = frame::write_frame(&mut stream, FrameKind::Text, response.as_bytes()).await
        {
            warn!(error = %e, "Failed to write response");
        }
    }
}

/// Execute a command and produce its response string.
async fn execute_command(
    command: &Command,
    users: &CredentialStore,
    audio: &AudioSink,
) -> &'static str {
    match command {
        Command::Register { username, password } => {
            if users.insert_if_absent(username, password) {
                Response::register_success()
            } else {
                Response::register_fail()
            }
        }

        Command::Login { username, password } => {
            if users.verify(username, password) {
                Response::login_success()
            } else {
                Response::login_fail()
            }
        }

        Command::Audio { payload } => {
            // Write failures are logged only; the client still sees
            // AUDIO_SUCCESS (inherited protocol behavior).
            if let Err(e) = audio.save(payload).await {
                error!(path = %audio.path().display(), error = %e, "Failed to save audio");
            }
            Response::audio_success()
        }

        Command::Unknown => Response::unknown_command(),
    }
}
