//! Transport configuration.

use std::sync::Arc;
use std::time::Duration;

/// Configuration of a [`HyperClient`](crate::HyperClient) transport.
///
/// No timeout is applied unless one is set: a call is a single attempt that
/// lasts as long as the server takes to answer.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, off by default.
    pub timeout: Option<Duration>,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// Speak HTTP/2 only, with prior knowledge on plain connections.
    pub http2_only: bool,
    /// Custom TLS settings, Mozilla roots otherwise.
    pub tls: Option<Arc<rustls::ClientConfig>>,
}

/// Per-call alternate transport handed to [`execute`](crate::execute).
pub type TransportConfig = ClientConfig;

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            http2_only: false,
            tls: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// HTTP/2-only transport with custom TLS settings.
    #[must_use]
    pub fn http2_with_tls(tls: rustls::ClientConfig) -> Self {
        Self::builder().http2_only(true).tls_config(tls).build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    http2_only: Option<bool>,
    tls: Option<Arc<rustls::ClientConfig>>,
}

impl ClientConfigBuilder {
    /// Set the whole-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Restrict the transport to HTTP/2.
    #[must_use]
    pub const fn http2_only(mut self, enabled: bool) -> Self {
        self.http2_only = Some(enabled);
        self
    }

    /// Use custom TLS settings.
    #[must_use]
    pub fn tls_config(mut self, tls: rustls::ClientConfig) -> Self {
        self.tls = Some(Arc::new(tls));
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            http2_only: self.http2_only.unwrap_or(defaults.http2_only),
            tls: self.tls.or(defaults.tls),
        }
    }
}
