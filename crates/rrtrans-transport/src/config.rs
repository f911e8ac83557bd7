use std::time::Duration;

/// Tuning for [`TcpTransport`](crate::TcpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Maximum frames queued or being written at once. Default: 3.
    pub pool_size: usize,
    /// Timeout for establishing the receiver connection.
    pub connect_timeout: Duration,
    /// Write timeout on the receiver socket.
    pub write_timeout: Option<Duration>,
    /// Largest accepted frame width or height.
    pub max_dimension: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            pool_size: 3,
            connect_timeout: Duration::from_secs(10),
            write_timeout: Some(Duration::from_secs(30)),
            max_dimension: 16384,
        }
    }
}
