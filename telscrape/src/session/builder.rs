//! Builder for creating Telnet sessions.

use std::time::Duration;

use super::engine::TelnetSession;
use crate::channel::PromptPattern;
use crate::error::{ChannelError, PlatformError, Result};
use crate::platform::{PlatformDefinition, PlatformRegistry};
use crate::telnet::{NegotiationObserver, Negotiator};
use crate::transport::{TelnetStream, TransportConfig};

/// Builder for constructing Telnet sessions.
///
/// The prompt pattern is taken from, in order: [`prompt_pattern`](Self::prompt_pattern),
/// the platform, or the default `.*[#$:]$`. The negotiator follows the same
/// precedence, falling back to [`Negotiator::ignore`].
///
/// # Example
///
/// ```rust,no_run
/// use telscrape::SessionBuilder;
///
/// # async fn example() -> Result<(), telscrape::Error> {
/// let mut session = SessionBuilder::new("192.168.1.1")
///     .platform("cisco_ios")
///     .build()?;
///
/// session.connect().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    config: TransportConfig,
    platform_name: Option<String>,
    custom_platform: Option<PlatformDefinition>,
    prompt_pattern: Option<String>,
    negotiator: Option<Negotiator>,
    observer: Option<NegotiationObserver>,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self::from_config(TransportConfig::new(host))
    }

    /// Start from an existing transport configuration.
    pub fn from_config(config: TransportConfig) -> Self {
        Self {
            config,
            platform_name: None,
            custom_platform: None,
            prompt_pattern: None,
            negotiator: None,
            observer: None,
        }
    }

    /// Set the Telnet port (default: 23).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the platform name (e.g., "generic", "cisco_ios").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set a custom platform definition.
    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.custom_platform = Some(platform);
        self
    }

    /// Override the prompt pattern.
    pub fn prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = Some(pattern.into());
        self
    }

    /// Override the option negotiator.
    pub fn negotiator(mut self, negotiator: Negotiator) -> Self {
        self.negotiator = Some(negotiator);
        self
    }

    /// Receive every negotiation exchange.
    pub fn observer(mut self, observer: NegotiationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the read-to-prompt deadline. Unset means wait indefinitely.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    /// Build an unconnected session that dials the configured host.
    pub fn build(self) -> Result<TelnetSession> {
        let config = self.config.clone();
        self.finish(TelnetSession::new(config))
    }

    /// Build an unconnected session that runs over `stream`.
    pub fn build_over_stream<S: TelnetStream + 'static>(self, stream: S) -> Result<TelnetSession> {
        let config = self.config.clone();
        self.finish(TelnetSession::over_stream(stream, config))
    }

    fn finish(self, mut session: TelnetSession) -> Result<TelnetSession> {
        let platform = if let Some(custom) = self.custom_platform {
            Some(custom)
        } else if let Some(name) = self.platform_name {
            let registry = PlatformRegistry::global()
                .read()
                .map_err(|_| PlatformError::InvalidDefinition {
                    message: "Failed to acquire registry lock".to_string(),
                })?;
            Some(
                registry
                    .get(&name)
                    .ok_or(PlatformError::UnknownPlatform { name })?
                    .clone(),
            )
        } else {
            None
        };

        let prompt = match (&self.prompt_pattern, &platform) {
            (Some(pattern), _) => PromptPattern::new(pattern).map_err(ChannelError::from)?,
            (None, Some(platform)) => platform.compile_prompt()?,
            (None, None) => PromptPattern::default(),
        };
        session.set_prompt_pattern(prompt);

        let negotiator = self
            .negotiator
            .or_else(|| platform.as_ref().map(|p| p.negotiator.clone()))
            .unwrap_or_default();
        session.set_option_negotiator(negotiator);

        session.set_negotiation_observer(self.observer);

        if let Some(platform) = platform {
            session.set_platform(platform);
        }

        Ok(session)
    }
}
