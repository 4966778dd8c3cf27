use serde_json::{Value, json};

use crate::error::Error;
use crate::gen2::Gen2Client;
use crate::gen2::models::{KvsDeleteResult, KvsGetMany, KvsList, KvsSetResult, KvsValue};

/// The device-hosted key-value store. Device-level — no index.
#[derive(Clone, Copy)]
pub struct Kvs<'a> {
    client: &'a Gen2Client,
}

impl<'a> Kvs<'a> {
    pub(crate) fn new(client: &'a Gen2Client) -> Self {
        Self { client }
    }

    /// `KVS.List` — all keys with their etags, plus the store revision.
    pub async fn list(&self) -> Result<KvsList, Error> {
        self.client.call("KVS.List", None).await
    }

    /// `KVS.Get` — one value with its etag.
    pub async fn get(&self, key: &str) -> Result<KvsValue, Error> {
        self.client
            .call("KVS.Get", Some(json!({ "key": key })))
            .await
    }

    /// `KVS.GetMany` — values whose keys match a glob pattern.
    pub async fn get_many(&self, pattern: &str) -> Result<KvsGetMany, Error> {
        self.client
            .call("KVS.GetMany", Some(json!({ "match": pattern })))
            .await
    }

    /// Every item in the store (`GetMany("*")`).
    pub async fn get_all(&self) -> Result<KvsGetMany, Error> {
        self.get_many("*").await
    }

    /// `KVS.Set` — create or replace a value.
    pub async fn set(&self, key: &str, value: Value) -> Result<KvsSetResult, Error> {
        self.client
            .call("KVS.Set", Some(json!({ "key": key, "value": value })))
            .await
    }

    /// `KVS.Delete`.
    pub async fn delete(&self, key: &str) -> Result<KvsDeleteResult, Error> {
        self.client
            .call("KVS.Delete", Some(json!({ "key": key })))
            .await
    }
}
