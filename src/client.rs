//! Root client for a Proxmox VE cluster.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::node::Node;
use crate::resource::ApiResource;
use crate::session::{Session, SessionConfig};

/// Default authentication realm.
const DEFAULT_REALM: &str = "pam";

/// Default timeout applied to connection establishment and the full request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Entry point to the API: the root resource, owning the session.
///
/// Derive node and VM handles from it; every handle dispatches through the
/// one session this client owns.
#[derive(Debug)]
pub struct PveClient {
    session: Session,
}

impl PveClient {
    /// Start configuring a client for `host`.
    pub fn builder(host: &str) -> ClientBuilder {
        ClientBuilder::new(host)
    }

    /// Connect and authenticate with the default configuration.
    pub async fn login(host: &str, username: &str, password: &str) -> Result<Self> {
        ClientBuilder::new(host).login(username, password).await
    }

    /// Handle for the cluster node `name`. Pure constructor, no request
    /// is issued.
    pub fn node(&self, name: &str) -> Node<'_> {
        Node::new(self, name)
    }

    /// Username the client authenticated as.
    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }
}

#[async_trait]
impl ApiResource for PveClient {
    fn session(&self) -> &Session {
        &self.session
    }

    // The client is the API root.
    fn path(&self) -> String {
        String::new()
    }
}

/// Builder for [`PveClient`] connections.
///
/// Defaults: realm `pam`, TLS verification on, no proxy, 5 second timeout.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    host: String,
    realm: String,
    tls_verify: bool,
    proxy_url: Option<String>,
    proxy_auth: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            realm: DEFAULT_REALM.to_string(),
            tls_verify: true,
            proxy_url: None,
            proxy_auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Authentication realm (`pam`, `pve`, or a configured domain).
    pub fn realm(mut self, realm: &str) -> Self {
        self.realm = realm.to_string();
        self
    }

    /// Toggle TLS certificate verification. Clusters running self-signed
    /// certificates need this off.
    pub fn tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Route requests through an HTTP proxy.
    pub fn proxy(mut self, url: &str) -> Self {
        self.proxy_url = Some(url.to_string());
        self
    }

    /// Proxy credentials in `user:password` format.
    pub fn proxy_auth(mut self, credentials: &str) -> Self {
        self.proxy_auth = Some(credentials.to_string());
        self
    }

    /// Timeout applied to connection establishment and the full request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the transport without authenticating. Requests carry no auth
    /// headers until a ticket exists.
    pub fn connect(self) -> Result<PveClient> {
        let session = Session::connect(self.into_config())?;
        Ok(PveClient { session })
    }

    /// Build the transport and obtain a ticket for `username`.
    pub async fn login(self, username: &str, password: &str) -> Result<PveClient> {
        let mut client = self.connect()?;
        client.session.authenticate(username, password).await?;
        Ok(client)
    }

    fn into_config(self) -> SessionConfig {
        SessionConfig {
            host: self.host,
            realm: self.realm,
            tls_verify: self.tls_verify,
            proxy_url: self.proxy_url,
            proxy_auth: self.proxy_auth,
            timeout: self.timeout,
        }
    }
}
