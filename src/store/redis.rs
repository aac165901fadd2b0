//! Redis-backed store shared by every replica.
//!
//! # Responsibilities
//! - Hold one multiplexed connection, opened lazily on first use
//! - Translate list operations to RPUSH / LRANGE / LLEN
//! - Reserve an id and append in one server-side script
//! - Apply the configured deadline to connects and commands
//!
//! # Design Decisions
//! - Startup never blocks on Redis; an unreachable server only fails requests
//! - A failed command drops the cached connection so the next call reconnects
//! - Read-then-write sequences run as Lua scripts; no MULTI/EXEC on the shared connection

use std::sync::Arc;
use std::time::Duration;

use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Client, RedisError, Script};
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::resilience::timeouts::with_deadline;
use crate::store::{ListStore, NumberedRecord, StoreError, StoreResult};

/// KEYS[1] list, KEYS[2] counter, ARGV[1] head, ARGV[2] tail.
const PUSH_NUMBERED: &str = r#"
if redis.call('EXISTS', KEYS[2]) == 0 then
  redis.call('SET', KEYS[2], redis.call('LLEN', KEYS[1]))
end
local id = redis.call('INCR', KEYS[2])
redis.call('RPUSH', KEYS[1], ARGV[1] .. string.format('%d', id) .. ARGV[2])
return id
"#;

/// Store backed by a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    conn: Arc<Mutex<Option<MultiplexedConnection>>>,
    push_numbered: Script,
    timeout: Duration,
    url: String,
}

impl RedisStore {
    /// Create a store for the configured server. No connection is made yet.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let url = config.redis_url();
        let client = Client::open(url.as_str())
            .map_err(|e| StoreError::Connect(format!("invalid redis url '{}': {}", url, e)))?;

        Ok(Self {
            client,
            conn: Arc::new(Mutex::new(None)),
            push_numbered: Script::new(PUSH_NUMBERED),
            timeout: Duration::from_millis(config.timeout_ms),
            url,
        })
    }

    async fn connection(&self) -> StoreResult<MultiplexedConnection> {
        let mut cached = self.conn.lock().await;
        if let Some(conn) = cached.as_ref() {
            return Ok(conn.clone());
        }

        let conn = with_deadline(self.timeout, async {
            self.client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| StoreError::Connect(e.to_string()))
        })
        .await?;

        tracing::info!(url = %self.url, "Connected to redis");
        *cached = Some(conn.clone());
        Ok(conn)
    }

    async fn reset(&self) {
        self.conn.lock().await.take();
    }

    /// Run one command on a fresh handle of the shared connection.
    async fn run<T, F, Fut>(&self, op: &'static str, command: F) -> StoreResult<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: std::future::Future<Output = Result<T, RedisError>>,
    {
        let conn = self.connection().await?;
        let result = with_deadline(self.timeout, async {
            command(conn).await.map_err(|e| StoreError::Command(e.to_string()))
        })
        .await;

        if let Err(e) = &result {
            tracing::warn!(operation = op, error = %e, "Redis command failed, dropping connection");
            self.reset().await;
        }
        result
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ListStore for RedisStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        self.run("rpush", |mut conn| async move {
            let len: u64 = conn.rpush(key, value).await?;
            Ok::<_, RedisError>(len)
        })
        .await
    }

    async fn range_all(&self, key: &str) -> StoreResult<Vec<String>> {
        self.run("lrange", |mut conn| async move {
            let items: Vec<String> = conn.lrange(key, 0, -1).await?;
            Ok::<_, RedisError>(items)
        })
        .await
    }

    async fn len(&self, key: &str) -> StoreResult<u64> {
        self.run("llen", |mut conn| async move {
            let len: u64 = conn.llen(key).await?;
            Ok::<_, RedisError>(len)
        })
        .await
    }

    async fn push_numbered(
        &self,
        key: &str,
        counter_key: &str,
        record: &NumberedRecord,
    ) -> StoreResult<u64> {
        let script = &self.push_numbered;
        self.run("push_numbered", |mut conn| async move {
            let id: u64 = script
                .key(key)
                .key(counter_key)
                .arg(record.head.as_str())
                .arg(record.tail.as_str())
                .invoke_async(&mut conn)
                .await?;
            Ok::<_, RedisError>(id)
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.run("ping", |mut conn| async move {
            let _pong: String = ::redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, RedisError>(())
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
