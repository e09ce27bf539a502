use amiquip::{AmqpProperties, Channel, Connection, Publish, QueueDeclareOptions};
use log::debug;

use crate::broker::{Broker, BrokerConnection, QueueOptions};
use crate::error::BrokerError;

pub const DEFAULT_PORT: u16 = 5672;
pub const DEFAULT_USER: &str = "guest";
pub const DEFAULT_PASSWORD: &str = "guest";
/// AMQP `delivery_mode` asking the broker to keep the message across restarts.
pub const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// Connects to a RabbitMQ-compatible broker over plain TCP with the default credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmqpBroker;

impl AmqpBroker {
    #[must_use]
    pub fn url(host: &str) -> String {
        format!("amqp://{DEFAULT_USER}:{DEFAULT_PASSWORD}@{host}:{DEFAULT_PORT}")
    }
}

impl Broker for AmqpBroker {
    type Connection = AmqpConnection;

    fn connect(&self, host: &str) -> Result<AmqpConnection, BrokerError> {
        let mut connection = Connection::insecure_open(&Self::url(host))?;
        let channel = match connection.open_channel(None) {
            Ok(channel) => channel,
            Err(e) => {
                connection.close().ok();
                return Err(e.into());
            }
        };
        debug!("Opened AMQP channel {} to {}", channel.channel_id(), host);
        Ok(AmqpConnection {
            connection: Some(connection),
            channel: Some(channel),
        })
    }
}

/// A connection with its single channel. Both are taken out on close.
pub struct AmqpConnection {
    connection: Option<Connection>,
    channel: Option<Channel>,
}

impl AmqpConnection {
    fn channel(&self) -> Result<&Channel, BrokerError> {
        self.channel.as_ref().ok_or(BrokerError::Closed)
    }
}

impl BrokerConnection for AmqpConnection {
    fn declare_queue(&mut self, name: &str, options: &QueueOptions) -> Result<(), BrokerError> {
        let queue = self.channel()?.queue_declare(
            name,
            QueueDeclareOptions {
                durable: options.durable,
                exclusive: options.exclusive,
                auto_delete: options.auto_delete,
                ..QueueDeclareOptions::default()
            },
        )?;
        debug!(
            "Declared queue {} ({} messages waiting)",
            queue.name(),
            queue.declared_message_count().unwrap_or(0)
        );
        Ok(())
    }

    fn publish(
        &mut self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
        persistent: bool,
    ) -> Result<(), BrokerError> {
        let properties = if persistent {
            AmqpProperties::default().with_delivery_mode(DELIVERY_MODE_PERSISTENT)
        } else {
            AmqpProperties::default()
        };
        self.channel()?.basic_publish(
            exchange,
            Publish::with_properties(body, routing_key, properties),
        )?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        let channel_closed = self.channel.take().map_or(Ok(()), Channel::close);
        let connection = self.connection.take().ok_or(BrokerError::Closed)?;
        connection.close()?;
        channel_closed.map_err(BrokerError::from)
    }
}
