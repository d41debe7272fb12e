//! Redis-backed documents.
//
//  Keys / channels
//  ---------------
//  game:<code>           – STRING  JSON GameState
//  game:<code>:updates   – PUB/SUB every committed GameState (JSON)

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use once_cell::sync::Lazy;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client as RedisClient, Script};

use crate::{
    code::GameCode,
    game::types::GameState,
    store::{CommitStatus, GameStore, Result, Snapshot},
};

/// Compare-and-set plus publish, executed atomically on the server.
/// Returns 1 on success, 0 on conflict, -1 when the key is gone.
static COMPARE_AND_SET: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        local current = redis.call('GET', KEYS[1])
        if not current then
            return -1
        end
        if current ~= ARGV[1] then
            return 0
        end
        redis.call('SET', KEYS[1], ARGV[2])
        redis.call('PUBLISH', ARGV[3], ARGV[2])
        return 1
        ",
    )
});

#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = RedisClient::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(RedisStore { client, conn })
    }
}

#[async_trait]
impl GameStore for RedisStore {
    async fn insert_new(&self, code: &GameCode, state: &GameState) -> Result<bool> {
        let raw = serde_json::to_string(state)?;
        let mut conn = self.conn.clone();
        let created: bool = conn.set_nx(code.doc_key(), raw).await?;
        Ok(created)
    }

    async fn fetch(&self, code: &GameCode) -> Result<Option<Snapshot>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(code.doc_key()).await?;
        raw.map(Snapshot::decode).transpose()
    }

    async fn commit(
        &self,
        code: &GameCode,
        expected: &Snapshot,
        next: &GameState,
    ) -> Result<CommitStatus> {
        let raw = serde_json::to_string(next)?;
        let mut conn = self.conn.clone();
        let status: i32 = COMPARE_AND_SET
            .key(code.doc_key())
            .arg(&expected.raw)
            .arg(&raw)
            .arg(code.updates_channel())
            .invoke_async(&mut conn)
            .await?;
        Ok(match status {
            1 => CommitStatus::Committed,
            -1 => CommitStatus::Missing,
            _ => CommitStatus::Conflict,
        })
    }

    async fn subscribe(&self, code: &GameCode) -> Result<BoxStream<'static, GameState>> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(code.updates_channel()).await?;
        let channel = code.updates_channel();
        let stream = pubsub.into_on_message().filter_map(move |msg| {
            let decoded = msg
                .get_payload::<String>()
                .ok()
                .and_then(|raw| match serde_json::from_str::<GameState>(&raw) {
                    Ok(state) => Some(state),
                    Err(e) => {
                        log::warn!("undecodable update on {channel}: {e}");
                        None
                    }
                });
            futures::future::ready(decoded)
        });
        Ok(stream.boxed())
    }
}
