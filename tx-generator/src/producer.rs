use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use rand::Rng;

use crate::broker::{Broker, BrokerConnection, ConnectionGuard, QueueOptions};
use crate::config::ProducerConfig;
use crate::error::ProducerError;
use crate::transaction::generate_transaction;

/// Publishing through the default exchange routes by queue name.
pub const DEFAULT_EXCHANGE: &str = "";

/// Declared non-durable while every message is flagged persistent. The flag only takes
/// effect if an operator redeclares the queue as durable.
pub const TRANSACTION_QUEUE_OPTIONS: QueueOptions = QueueOptions {
    durable: false,
    exclusive: false,
    auto_delete: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_messages` were sent
    Completed,
    /// The stop flag was raised between two publishes
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: u64,
    pub reason: StopReason,
}

/// Connects, declares the queue and publishes random transactions until `max_messages`
/// is reached or `stop` is raised. Once connected, the connection is closed exactly once
/// on every way out, including a failed publish.
///
/// # Errors
/// Errors when the broker can't be reached, the queue declaration is rejected, a publish
/// fails, or the connection fails to close after an otherwise successful run.
pub fn run<B, R>(
    broker: &B,
    config: &ProducerConfig,
    rng: &mut R,
    stop: &AtomicBool,
) -> Result<RunSummary, ProducerError>
where
    B: Broker,
    R: Rng + ?Sized,
{
    let connection = broker
        .connect(&config.host)
        .map_err(|source| ProducerError::Connection {
            host: config.host.clone(),
            source,
        })?;
    let mut guard = ConnectionGuard::new(connection);

    match publish_transactions(guard.connection(), config, rng, stop) {
        Ok(summary) => {
            guard.close().map_err(ProducerError::Close)?;
            Ok(summary)
        }
        Err(e) => {
            if let Err(close_err) = guard.close() {
                warn!("Failed to close broker connection: {}", close_err);
            }
            Err(e)
        }
    }
}

fn publish_transactions<C, R>(
    connection: &mut C,
    config: &ProducerConfig,
    rng: &mut R,
    stop: &AtomicBool,
) -> Result<RunSummary, ProducerError>
where
    C: BrokerConnection,
    R: Rng + ?Sized,
{
    connection
        .declare_queue(&config.queue_name, &TRANSACTION_QUEUE_OPTIONS)
        .map_err(|source| ProducerError::QueueDeclare {
            queue: config.queue_name.clone(),
            source,
        })?;

    info!("Sending random transactions... Ctrl+C to stop.");

    let mut sent = 0;
    loop {
        if stop.load(Ordering::SeqCst) {
            info!("Stopping producer...");
            return Ok(RunSummary {
                sent,
                reason: StopReason::Interrupted,
            });
        }
        if matches!(config.max_messages, Some(max) if sent >= max) {
            info!("Sent {} transactions to {}", sent, config.queue_name);
            return Ok(RunSummary {
                sent,
                reason: StopReason::Completed,
            });
        }

        let message = generate_transaction(rng).to_json()?;
        connection
            .publish(DEFAULT_EXCHANGE, &config.queue_name, message.as_bytes(), true)
            .map_err(ProducerError::Publish)?;
        info!("Sent: {}", message);
        sent += 1;
    }
}
