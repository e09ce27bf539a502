use log::warn;

use crate::error::BrokerError;

/// Flags sent along with a queue declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueOptions {
    /// Queue metadata survives a broker restart
    pub durable: bool,
    /// Queue is private to the declaring connection
    pub exclusive: bool,
    /// Queue is deleted once its last consumer goes away
    pub auto_delete: bool,
}

/// Entry point to a message broker.
pub trait Broker {
    type Connection: BrokerConnection;

    /// # Errors
    /// Errors when the broker at `host` is unreachable or refuses the connection
    fn connect(&self, host: &str) -> Result<Self::Connection, BrokerError>;
}

/// An open, exclusively owned broker connection.
pub trait BrokerConnection {
    /// # Errors
    /// Errors when a queue named `name` already exists with incompatible options,
    /// or the connection has failed
    fn declare_queue(&mut self, name: &str, options: &QueueOptions) -> Result<(), BrokerError>;

    /// # Errors
    /// Errors when the broker or the network fails while sending
    fn publish(
        &mut self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
        persistent: bool,
    ) -> Result<(), BrokerError>;

    /// # Errors
    /// Errors when the connection could not be shut down cleanly
    fn close(&mut self) -> Result<(), BrokerError>;
}

/// Owns a connection for the scope of a run and closes it exactly once, either through
/// [`ConnectionGuard::close`] or when dropped.
#[derive(Debug)]
pub struct ConnectionGuard<C: BrokerConnection> {
    connection: C,
    closed: bool,
}

impl<C: BrokerConnection> ConnectionGuard<C> {
    #[must_use]
    pub fn new(connection: C) -> Self {
        ConnectionGuard {
            connection,
            closed: false,
        }
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    /// # Errors
    /// Errors when the underlying connection fails to close
    pub fn close(mut self) -> Result<(), BrokerError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), BrokerError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.connection.close()
    }
}

impl<C: BrokerConnection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close broker connection: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct CountingConnection {
        closes: Rc<Cell<u32>>,
    }

    impl BrokerConnection for CountingConnection {
        fn declare_queue(&mut self, _: &str, _: &QueueOptions) -> Result<(), BrokerError> {
            Ok(())
        }

        fn publish(&mut self, _: &str, _: &str, _: &[u8], _: bool) -> Result<(), BrokerError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), BrokerError> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_guard_closes_once_on_explicit_close() {
        let closes = Rc::new(Cell::new(0));
        let guard = ConnectionGuard::new(CountingConnection {
            closes: Rc::clone(&closes),
        });
        assert!(guard.close().is_ok());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let closes = Rc::new(Cell::new(0));
        {
            let mut guard = ConnectionGuard::new(CountingConnection {
                closes: Rc::clone(&closes),
            });
            guard.connection().publish("", "q", b"{}", true).unwrap();
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_guard_closes_during_unwind() {
        let closes = Rc::new(Cell::new(0));
        let inner = Rc::clone(&closes);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = ConnectionGuard::new(CountingConnection { closes: inner });
            panic!("publish loop fault");
        }));
        assert!(result.is_err());
        assert_eq!(closes.get(), 1);
    }
}
