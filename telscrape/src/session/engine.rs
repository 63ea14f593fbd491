//! The Telnet session engine.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use log::{debug, trace};
use tokio::io::{AsyncWriteExt, ReadHalf, WriteHalf};

use super::response::{ReadResult, Response};
use crate::channel::{DecodeEvent, Decoder, PromptPattern};
use crate::error::{ChannelError, Error, Result, SessionError, TransportError};
use crate::platform::PlatformDefinition;
use crate::telnet::{NegotiationEvent, NegotiationObserver, Negotiator, TelnetOption};
use crate::transport::{BoxedStream, TelnetStream, TransportConfig, connect_tcp};

/// Lifecycle of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Connected,
    Closed,
}

/// Where `connect()` gets its stream from.
enum Endpoint {
    Tcp,
    Stream(Option<BoxedStream>),
}

struct SessionIo {
    decoder: Decoder<ReadHalf<BoxedStream>>,
    writer: WriteHalf<BoxedStream>,
}

/// A Telnet session driving a remote line-oriented shell.
///
/// All reads and writes happen on the caller's task, one at a time. The
/// session answers option negotiation inline while reading, using its
/// [`Negotiator`].
///
/// # Example
///
/// ```rust,no_run
/// use telscrape::{TelnetSession, TransportConfig};
///
/// # async fn example() -> Result<(), telscrape::Error> {
/// let mut session = TelnetSession::new(TransportConfig::new("192.168.1.1"));
/// session.connect().await?;
///
/// let banner = session.read_to_prompt().await?;
/// println!("device prompt: {}", banner.prompt);
///
/// session.write("show version").await?;
/// for line in session.read().await? {
///     println!("{line}");
/// }
///
/// session.close().await;
/// # Ok(())
/// # }
/// ```
pub struct TelnetSession {
    config: TransportConfig,
    endpoint: Endpoint,
    prompt: PromptPattern,
    negotiator: Negotiator,
    observer: Option<NegotiationObserver>,
    platform: Option<PlatformDefinition>,
    state: SessionState,
    io: Option<SessionIo>,
    last_prompt: Option<String>,
}

impl TelnetSession {
    /// Create an unconnected session that will open a TCP connection.
    pub fn new(config: TransportConfig) -> Self {
        Self::with_endpoint(config, Endpoint::Tcp)
    }

    /// Create an unconnected session that will run over `stream`.
    ///
    /// `connect()` takes ownership of the stream instead of dialing
    /// `config.host`. The remaining config fields still apply.
    pub fn over_stream<S: TelnetStream + 'static>(stream: S, config: TransportConfig) -> Self {
        Self::with_endpoint(config, Endpoint::Stream(Some(Box::new(stream))))
    }

    fn with_endpoint(config: TransportConfig, endpoint: Endpoint) -> Self {
        Self {
            config,
            endpoint,
            prompt: PromptPattern::default(),
            negotiator: Negotiator::default(),
            observer: None,
            platform: None,
            state: SessionState::Unconnected,
            io: None,
            last_prompt: None,
        }
    }

    /// Open the transport and answer any initial option handshake.
    ///
    /// At most one decoder event is consumed here. Text that arrives before
    /// (or instead of) a handshake is kept for the next read.
    pub async fn connect(&mut self) -> Result<()> {
        match self.state {
            SessionState::Connected => return Err(SessionError::AlreadyConnected.into()),
            SessionState::Closed => return Err(SessionError::Closed.into()),
            SessionState::Unconnected => {}
        }

        let stream: BoxedStream = match &mut self.endpoint {
            Endpoint::Tcp => Box::new(connect_tcp(&self.config).await?) as BoxedStream,
            Endpoint::Stream(stream) => stream.take().ok_or_else(|| {
                TransportError::ConnectionFailed {
                    host: self.config.host.clone(),
                    port: self.config.port,
                    source: io::Error::new(
                        io::ErrorKind::NotConnected,
                        "stream was consumed by an earlier connect attempt",
                    ),
                }
            })?,
        };

        let (reader, writer) = tokio::io::split(stream);
        self.io = Some(SessionIo {
            decoder: Decoder::new(reader),
            writer,
        });
        self.state = SessionState::Connected;
        debug!("connected to {}", self.config.socket_addr());

        if let Err(e) = self.drain_handshake().await {
            self.release().await;
            self.state = SessionState::Unconnected;
            return Err(e);
        }

        Ok(())
    }

    async fn drain_handshake(&mut self) -> Result<()> {
        let first = match self.config.read_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, self.next_event()).await {
                Ok(event) => event,
                Err(_) => {
                    debug!("no data from remote within {:?} of connecting", timeout);
                    return Ok(());
                }
            },
            None => self.next_event().await,
        };

        // The connection is not usable until the handshake has been read.
        let first = first.map_err(|e| match e {
            Error::Channel(ChannelError::Read(source)) => TransportError::ConnectionFailed {
                host: self.config.host.clone(),
                port: self.config.port,
                source,
            }
            .into(),
            other => other,
        })?;

        match first {
            DecodeEvent::Options(batch) => self.negotiate(batch).await,
            other => {
                if let Some(io) = self.io.as_mut() {
                    io.decoder.push_back(other);
                }
                Ok(())
            }
        }
    }

    /// Send `line` followed by CR LF. Does not read.
    pub async fn write(&mut self, line: &str) -> Result<()> {
        let io = self.io_mut()?;

        let mut data = Vec::with_capacity(line.len() + 2);
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(b"\r\n");

        trace!("sending {} bytes", data.len());
        send(&mut io.writer, &data).await
    }

    /// Read to the next prompt, returning only the data lines.
    ///
    /// The prompt is kept and available from [`last_prompt`](Self::last_prompt).
    pub async fn read(&mut self) -> Result<Vec<String>> {
        Ok(self.read_to_prompt().await?.lines)
    }

    /// Collect lines until one is classified as a prompt.
    ///
    /// Fails with [`ChannelError::PromptNotFound`] if the stream ends first,
    /// and with [`ChannelError::ReadTimeout`] if a read timeout is configured
    /// and exceeded. Lines collected before a failure are discarded.
    ///
    /// The read timeout only bounds waiting for input. A negotiation reply
    /// that has started is always written in full, and input decoded before
    /// a timeout stays with the session for the next read. Dropping this
    /// future from outside while a reply is being written is not safe.
    pub async fn read_to_prompt(&mut self) -> Result<ReadResult> {
        self.io_mut()?;

        let read = self.collect_to_prompt().await?;
        self.last_prompt = Some(read.prompt.clone());
        Ok(read)
    }

    async fn collect_to_prompt(&mut self) -> Result<ReadResult> {
        let deadline = self
            .config
            .read_timeout
            .map(|timeout| (tokio::time::Instant::now() + timeout, timeout));

        let mut lines = Vec::new();
        loop {
            let event = match deadline {
                Some((at, timeout)) => tokio::time::timeout_at(at, self.next_event())
                    .await
                    .map_err(|_| ChannelError::ReadTimeout(timeout))??,
                None => self.next_event().await?,
            };

            match event {
                DecodeEvent::Options(batch) => self.negotiate(batch).await?,
                DecodeEvent::Line(line) => match self.prompt.classify(&line) {
                    Some(matched) => return Ok(ReadResult::new(lines, matched.prompt)),
                    None => lines.push(line),
                },
                DecodeEvent::Prompt(matched) => return Ok(ReadResult::new(lines, matched.prompt)),
                DecodeEvent::Eof { partial } => {
                    debug!("stream ended after {} lines without a prompt", lines.len());
                    return Err(ChannelError::PromptNotFound { partial }.into());
                }
            }
        }
    }

    /// Send a command and read its output up to the next prompt.
    ///
    /// If the first output line is the echoed command, it is dropped.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        let start = Instant::now();

        self.write(command).await?;
        let read = self.read_to_prompt().await?;

        let elapsed = start.elapsed();
        debug!(
            "command {:?} completed in {:?}, prompt={:?}",
            command, elapsed, read.prompt
        );

        Ok(Response::from_read(command, read, elapsed))
    }

    /// Send multiple commands sequentially.
    pub async fn send_commands(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(commands.len());
        for cmd in commands {
            responses.push(self.send_command(cmd).await?);
        }
        Ok(responses)
    }

    /// Run the platform's on-open commands, if a platform is attached.
    ///
    /// Intended to be called once the remote shell is ready for commands
    /// (after any login sequence).
    pub async fn run_on_open_commands(&mut self) -> Result<Vec<Response>> {
        let commands = self
            .platform
            .as_ref()
            .map(|p| p.on_open_commands.clone())
            .unwrap_or_default();

        let mut responses = Vec::with_capacity(commands.len());
        for cmd in &commands {
            responses.push(self.send_command(cmd).await?);
        }
        Ok(responses)
    }

    /// Release the input stream, the output stream and the transport.
    ///
    /// Never fails; errors while releasing are logged and ignored. Safe to
    /// call in any state, any number of times.
    pub async fn close(&mut self) {
        self.release().await;
        self.endpoint = Endpoint::Stream(None);
        if self.state != SessionState::Closed {
            debug!("session to {} closed", self.config.socket_addr());
        }
        self.state = SessionState::Closed;
    }

    async fn release(&mut self) {
        let Some(SessionIo { decoder, mut writer }) = self.io.take() else {
            return;
        };

        let reader = decoder.into_inner();

        if let Err(e) = writer.shutdown().await {
            debug!("ignoring error shutting down output: {}", e);
        }

        drop(reader.unsplit(writer));
    }

    /// Install the option negotiation policy.
    pub fn set_option_negotiator(&mut self, negotiator: Negotiator) {
        self.negotiator = negotiator;
    }

    /// Install (or remove) the negotiation observability hook.
    pub fn set_negotiation_observer(&mut self, observer: Option<NegotiationObserver>) {
        self.observer = observer;
    }

    /// Replace the prompt pattern used from the next read on.
    pub fn set_prompt_pattern(&mut self, prompt: PromptPattern) {
        self.prompt = prompt;
    }

    pub(crate) fn set_platform(&mut self, platform: PlatformDefinition) {
        self.platform = Some(platform);
    }

    /// Get the current prompt pattern.
    pub fn prompt_pattern(&self) -> &PromptPattern {
        &self.prompt
    }

    /// Get the platform this session was built for, if any.
    pub fn platform(&self) -> Option<&PlatformDefinition> {
        self.platform.as_ref()
    }

    /// The prompt that ended the most recent successful read.
    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session is connected.
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn io_mut(&mut self) -> Result<&mut SessionIo> {
        match self.state {
            SessionState::Unconnected => return Err(SessionError::NotConnected.into()),
            SessionState::Closed => return Err(SessionError::Closed.into()),
            SessionState::Connected => {}
        }
        self.io
            .as_mut()
            .ok_or_else(|| SessionError::NotConnected.into())
    }

    async fn next_event(&mut self) -> Result<DecodeEvent> {
        let io = self.io.as_mut().ok_or(SessionError::NotConnected)?;
        io.decoder
            .next_event(&self.prompt)
            .await
            .map_err(|e| ChannelError::Read(e).into())
    }

    /// Answer a batch and report the exchange to the observer.
    async fn negotiate(&mut self, batch: Vec<TelnetOption>) -> Result<()> {
        let response = self.negotiator.respond(&batch);
        debug!(
            "negotiation: received [{}], answering [{}]",
            OptionList(&batch),
            OptionList(&response)
        );

        if !response.is_empty() {
            let io = self.io.as_mut().ok_or(SessionError::NotConnected)?;
            send(&mut io.writer, &TelnetOption::encode_all(&response)).await?;
        }

        if let Some(observer) = &self.observer {
            observer.notify(&NegotiationEvent { batch, response });
        }
        Ok(())
    }
}

impl fmt::Debug for TelnetSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelnetSession")
            .field("config", &self.config)
            .field("prompt", &self.prompt.as_str())
            .field("platform", &self.platform.as_ref().map(|p| p.name.as_str()))
            .field("state", &self.state)
            .field("last_prompt", &self.last_prompt)
            .finish()
    }
}

async fn send(writer: &mut WriteHalf<BoxedStream>, data: &[u8]) -> Result<()> {
    writer
        .write_all(data)
        .await
        .map_err(|source| SessionError::CommandFailed { source })?;
    writer
        .flush()
        .await
        .map_err(|source| SessionError::CommandFailed { source })?;
    Ok(())
}

struct OptionList<'a>(&'a [TelnetOption]);

impl fmt::Display for OptionList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, option) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{option}")?;
        }
        Ok(())
    }
}
