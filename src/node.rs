//! Cluster node resources.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::client::PveClient;
use crate::error::Result;
use crate::resource::ApiResource;
use crate::session::Session;
use crate::vm::Vm;

/// One cluster node, addressed under `/nodes/{name}`.
///
/// Cheap value object borrowing the client; create as many as needed and
/// drop them freely. A node cannot outlive the client it came from.
pub struct Node<'a> {
    client: &'a PveClient,
    name: String,
    config: RwLock<Option<Value>>,
}

impl<'a> Node<'a> {
    pub(crate) fn new(client: &'a PveClient, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
            config: RwLock::new(None),
        }
    }

    /// Node name as used in API paths.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle for QEMU VM `vmid` on this node. Pure constructor, no
    /// request is issued.
    pub fn vm(&self, vmid: u32) -> Vm<'_> {
        Vm::new(self, vmid)
    }

    /// Node configuration, fetched once and memoized for the lifetime of
    /// this instance. Callers needing fresh data create a new [`Node`].
    pub async fn config(&self) -> Result<Value> {
        {
            let cache = self.config.read().await;
            if let Some(config) = cache.as_ref() {
                tracing::debug!("returning cached config for node {}", self.name);
                return Ok(config.clone());
            }
        }

        let config = self.get("config", None).await?;

        let mut cache = self.config.write().await;
        *cache = Some(config.clone());
        Ok(config)
    }
}

#[async_trait]
impl ApiResource for Node<'_> {
    fn session(&self) -> &Session {
        self.client.session()
    }

    fn path(&self) -> String {
        format!("/nodes/{}", self.name)
    }
}
