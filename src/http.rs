//! HTTP transport for Proxmox VE REST API calls.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};

use crate::error::{Error, Result};
use crate::session::SessionConfig;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging.
/// Strips non-printable characters and truncates long responses.
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let printable: String = body
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();

    if printable.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &printable[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        printable
    }
}

/// Thin wrapper around one `reqwest::Client`, configured once per session.
///
/// Returns the raw status and body; error mapping happens at the session
/// layer, so transport failures are passed through with their original
/// kind (timeouts stay distinguishable from other failures).
#[derive(Debug)]
pub(crate) struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    /// Build the transport from session configuration.
    pub(crate) fn new(config: &SessionConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("pve-client/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.timeout)
            .timeout(config.timeout);

        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy_url) = &config.proxy_url {
            let mut proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| Error::Config(format!("invalid proxy URL: {e}")))?;
            if let Some(credentials) = &config.proxy_auth {
                let (user, password) = credentials.split_once(':').ok_or_else(|| {
                    Error::Config("proxy credentials must use the user:password format".to_string())
                })?;
                proxy = proxy.basic_auth(user, password);
            }
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url(&config.host),
        })
    }

    /// Dispatch one request and return the raw status and body.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        query: Option<&[(String, String)]>,
        form: Option<&[(String, String)]>,
    ) -> std::result::Result<(StatusCode, String), reqwest::Error> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url).headers(headers);
        if let Some(params) = query {
            request = request.query(params);
        }
        if let Some(params) = form {
            request = request.form(params);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok((status, body))
    }
}

/// API base for a configured host. Hosts are plain authorities
/// (`pve.example.com:8006`) served over https; a host given with an
/// explicit scheme is used verbatim.
fn base_url(host: &str) -> String {
    let origin = if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{host}")
    };
    format!("{origin}/api2/json")
}
