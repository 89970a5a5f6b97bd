//! QEMU virtual machine resources.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::node::Node;
use crate::resource::ApiResource;
use crate::session::Session;

/// One QEMU virtual machine, addressed under `{node}/qemu/{vmid}`.
///
/// Borrows its node the way the node borrows the client, so the ancestor
/// chain stays alive for as long as the handle does. Validating that a
/// vmid actually exists on the node is the caller's business.
pub struct Vm<'a> {
    node: &'a Node<'a>,
    id: u32,
    config: RwLock<Option<Value>>,
}

impl<'a> Vm<'a> {
    pub(crate) fn new(node: &'a Node<'a>, id: u32) -> Self {
        Self {
            node,
            id,
            config: RwLock::new(None),
        }
    }

    /// Numeric VM id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// VM configuration, fetched once and memoized for the lifetime of
    /// this instance. Callers needing fresh data create a new [`Vm`].
    pub async fn config(&self) -> Result<Value> {
        {
            let cache = self.config.read().await;
            if let Some(config) = cache.as_ref() {
                tracing::debug!("returning cached config for vm {}", self.id);
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
impl ApiResource for Vm<'_> {
    fn session(&self) -> &Session {
        self.node.session()
    }

    fn path(&self) -> String {
        format!("{}/qemu/{}", self.node.path(), self.id)
    }
}
