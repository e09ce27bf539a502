use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("AMQP Error: {0}")]
    Amqp(#[from] amiquip::Error),
    #[error("The broker connection is already closed")]
    Closed,
    /// Raised by `Broker` implementations that don't speak AMQP, such as in-memory brokers
    #[error("Broker unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Failed to connect to the broker at {host}: {source}")]
    Connection {
        host: String,
        #[source]
        source: BrokerError,
    },
    #[error("Failed to declare queue {queue}: {source}")]
    QueueDeclare {
        queue: String,
        #[source]
        source: BrokerError,
    },
    #[error("Failed to publish message: {0}")]
    Publish(#[source] BrokerError),
    #[error("Failed to close the broker connection: {0}")]
    Close(#[source] BrokerError),
    #[error("JSON Error")]
    Json(#[from] serde_json::Error),
    #[error("I/O Error")]
    IoError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_error_carries_broker_cause() {
        let err = ProducerError::Connection {
            host: "localhost".to_string(),
            source: BrokerError::Unavailable("connection refused".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to connect to the broker at localhost: Broker unavailable: connection refused"
        );

        let err = ProducerError::Publish(BrokerError::Closed);
        assert_eq!(
            err.to_string(),
            "Failed to publish message: The broker connection is already closed"
        );
    }
}
