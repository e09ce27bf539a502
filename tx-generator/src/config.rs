pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_QUEUE_NAME: &str = "transactions_queue";
pub const DEFAULT_MAX_MESSAGES: u64 = 100;

/// Settings for a single producer run, fixed once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    /// Broker address to connect to
    pub host: String,
    /// Queue the transactions are routed to through the default exchange
    pub queue_name: String,
    /// `None` publishes until interrupted
    pub max_messages: Option<u64>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        ProducerConfig {
            host: DEFAULT_HOST.to_string(),
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            max_messages: Some(DEFAULT_MAX_MESSAGES),
        }
    }
}

impl ProducerConfig {
    #[must_use]
    pub fn with_max_messages(requested: Option<i64>) -> Self {
        ProducerConfig {
            max_messages: Some(resolve_max_messages(requested)),
            ..ProducerConfig::default()
        }
    }
}

/// A missing, zero or negative request falls back to [`DEFAULT_MAX_MESSAGES`]
/// instead of meaning "send nothing" or "send forever".
#[must_use]
pub fn resolve_max_messages(requested: Option<i64>) -> u64 {
    requested
        .and_then(|max| u64::try_from(max).ok())
        .filter(|&max| max > 0)
        .unwrap_or(DEFAULT_MAX_MESSAGES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_max_messages() {
        assert_eq!(resolve_max_messages(Some(5)), 5);
        assert_eq!(resolve_max_messages(None), DEFAULT_MAX_MESSAGES);
        assert_eq!(resolve_max_messages(Some(0)), DEFAULT_MAX_MESSAGES);
        assert_eq!(resolve_max_messages(Some(-3)), DEFAULT_MAX_MESSAGES);
        assert_eq!(
            resolve_max_messages(Some(i64::MAX)),
            u64::try_from(i64::MAX).unwrap()
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = ProducerConfig::with_max_messages(Some(0));
        assert_eq!(config, ProducerConfig::default());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.queue_name, "transactions_queue");

        let config = ProducerConfig::with_max_messages(Some(5));
        assert_eq!(config.max_messages, Some(5));
    }
}
