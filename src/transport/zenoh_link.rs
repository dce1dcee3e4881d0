// Zenoh transport: a remote driver publishes protocol lines and holds a
// liveliness token while it is running. The car counts as connected while at
// least one token is alive.

use std::collections::HashSet;

use tracing::{debug, info};
use zenoh::handlers::FifoChannelHandler;
use zenoh::pubsub::Subscriber;
use zenoh::sample::{Sample, SampleKind};
use zenoh::Session;

use super::Transport;
use crate::config::{TOPIC_CMD, TOPIC_LINK};

pub struct ZenohTransport {
    commands: Subscriber<FifoChannelHandler<Sample>>,
    drivers: Subscriber<FifoChannelHandler<Sample>>,
    alive: HashSet<String>,
}

impl ZenohTransport {
    pub async fn open(session: &Session) -> zenoh::Result<Self> {
        let commands = session.declare_subscriber(TOPIC_CMD).await?;
        // history: pick up drivers that were already running
        let drivers = session
            .liveliness()
            .declare_subscriber(TOPIC_LINK)
            .history(true)
            .await?;

        info!("Listening for lines on {}, drivers on {}", TOPIC_CMD, TOPIC_LINK);
        Ok(Self {
            commands,
            drivers,
            alive: HashSet::new(),
        })
    }
}

impl ZenohTransport {
    fn drop_pending_lines(&mut self) {
        let mut dropped = 0;
        while let Ok(Some(_)) = self.commands.try_recv() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("Dropped {} line(s) received with no driver connected", dropped);
        }
    }
}

impl Transport for ZenohTransport {
    fn is_connected(&mut self) -> bool {
        // Lines published while nobody was connected are stale
        if self.alive.is_empty() {
            self.drop_pending_lines();
        }

        while let Ok(Some(sample)) = self.drivers.try_recv() {
            let key = sample.key_expr().as_str().to_string();
            match sample.kind() {
                SampleKind::Put => {
                    info!("Driver up: {}", key);
                    self.alive.insert(key);
                }
                SampleKind::Delete => {
                    info!("Driver gone: {}", key);
                    self.alive.remove(&key);
                }
            }
        }
        !self.alive.is_empty()
    }

    fn next_line(&mut self) -> Option<String> {
        let sample = self.commands.try_recv().ok().flatten()?;
        let payload = sample.payload().to_bytes();
        Some(String::from_utf8_lossy(&payload).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn local_session() -> Session {
        let mut config = zenoh::Config::default();
        config
            .insert_json5("scouting/multicast/enabled", "false")
            .unwrap();
        zenoh::open(config).await.unwrap()
    }

    /// Poll `is_connected` until it reports `expected` or about a second passes
    async fn wait_for_link(transport: &mut ZenohTransport, expected: bool) -> bool {
        for _ in 0..100 {
            if transport.is_connected() == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    async fn wait_for_line(transport: &mut ZenohTransport) -> Option<String> {
        for _ in 0..100 {
            if let Some(line) = transport.next_line() {
                return Some(line);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_connected_follows_liveliness_token() {
        let session = local_session().await;
        let mut transport = ZenohTransport::open(&session).await.unwrap();
        assert!(!transport.is_connected(), "no driver yet");

        let token = session
            .liveliness()
            .declare_token("futbot/link/test")
            .await
            .unwrap();
        assert!(wait_for_link(&mut transport, true).await, "token should connect");

        session.put(TOPIC_CMD, "F1".to_string()).await.unwrap();
        assert_eq!(wait_for_line(&mut transport).await.as_deref(), Some("F1"));

        token.undeclare().await.unwrap();
        assert!(wait_for_link(&mut transport, false).await, "undeclare should disconnect");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_lines_without_driver_are_dropped() {
        let session = local_session().await;
        let mut transport = ZenohTransport::open(&session).await.unwrap();

        session.put(TOPIC_CMD, "U".to_string()).await.unwrap();
        // Several disconnected polls, as the control loop does while waiting
        for _ in 0..20 {
            assert!(!transport.is_connected());
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let _token = session
            .liveliness()
            .declare_token("futbot/link/test")
            .await
            .unwrap();
        assert!(wait_for_link(&mut transport, true).await);
        assert_eq!(transport.next_line(), None, "stale U must not be replayed");

        session.put(TOPIC_CMD, "D".to_string()).await.unwrap();
        assert_eq!(wait_for_line(&mut transport).await.as_deref(), Some("D"));
    }
}
