//! Session state and request dispatch.
//!
//! The session owns the one HTTP transport, holds the ticket obtained from
//! `/access/ticket`, and funnels every resource request through
//! [`Session::request`]: parameter routing, auth headers, error mapping,
//! and envelope unwrapping all happen here and nowhere else.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{sanitize_for_log, Transport};

/// Header carrying the CSRF prevention token on authenticated requests.
const CSRF_TOKEN_HEADER: HeaderName = HeaderName::from_static("csrfpreventiontoken");

/// Connection settings assembled by [`crate::ClientBuilder`].
#[derive(Debug, Clone)]
pub(crate) struct SessionConfig {
    pub(crate) host: String,
    pub(crate) realm: String,
    pub(crate) tls_verify: bool,
    pub(crate) proxy_url: Option<String>,
    pub(crate) proxy_auth: Option<String>,
    pub(crate) timeout: Duration,
}

/// Credential fields consumed from the ticket endpoint payload.
#[derive(Debug, Clone, Deserialize)]
struct AuthState {
    username: String,
    ticket: String,
    #[serde(rename = "CSRFPreventionToken")]
    csrf_token: String,
}

/// Authenticated connection to one Proxmox VE cluster endpoint.
///
/// Exclusively owns the transport. Auth state is written once by a
/// successful [`authenticate`](Session::authenticate) and never mutated
/// afterwards; [`request`](Session::request) leaves the session untouched.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    transport: Transport,
    auth: Option<AuthState>,
}

impl Session {
    pub(crate) fn connect(config: SessionConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            config,
            transport,
            auth: None,
        })
    }

    /// Username the session authenticated as, including the realm suffix.
    pub fn username(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.username.as_str())
    }

    /// Ticket issued by the authentication endpoint.
    pub fn ticket(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.ticket.as_str())
    }

    /// CSRF prevention token issued alongside the ticket.
    pub fn csrf_token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.csrf_token.as_str())
    }

    /// Obtain a ticket from `/access/ticket` and store it for subsequent
    /// requests. The realm comes from the session configuration.
    pub(crate) async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let params = serde_json::json!({
            "username": username,
            "password": password,
            "realm": self.config.realm,
        });

        let payload = match self
            .request(Method::POST, "/access/ticket", Some(&params))
            .await
        {
            Ok(payload) => payload,
            // A timeout is a transport condition, not a rejection.
            Err(err @ Error::Timeout(_)) => return Err(err),
            Err(err) => return Err(Error::Authentication(err.to_string())),
        };

        let auth: AuthState = serde_json::from_value(payload)
            .map_err(|e| Error::Authentication(format!("unexpected ticket payload: {e}")))?;

        tracing::info!("authenticated to {} as {}", self.config.host, auth.username);
        self.auth = Some(auth);
        Ok(())
    }

    /// Execute one API request and return the unwrapped `data` payload.
    ///
    /// GET parameters go to the query string, POST/PUT parameters to a
    /// form body, DELETE carries none. Boolean values are coerced to
    /// `1`/`0` as the remote expects.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Value>,
    ) -> Result<Value> {
        let encoded = params.map(encode_params).unwrap_or_default();
        let (query, form) = if method == Method::GET {
            (non_empty(&encoded), None)
        } else if method == Method::POST || method == Method::PUT {
            (None, non_empty(&encoded))
        } else {
            (None, None)
        };

        let headers = self.auth_headers()?;

        let (status, body) = self
            .transport
            .send(method, path, headers, query, form)
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let message = if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            } else {
                sanitize_for_log(&body)
            };
            return Err(Error::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        unwrap_envelope(&body)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout)
        } else {
            Error::Api {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    /// Cookie and CSRF headers for the current auth state; empty before
    /// authentication.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(auth) = &self.auth {
            let cookie = HeaderValue::from_str(&format!("PVEAuthCookie={}", auth.ticket))
                .map_err(|e| {
                    Error::Authentication(format!("ticket is not a valid cookie value: {e}"))
                })?;
            headers.insert(COOKIE, cookie);

            let token = HeaderValue::from_str(&auth.csrf_token).map_err(|e| {
                Error::Authentication(format!("CSRF token is not a valid header value: {e}"))
            })?;
            headers.insert(CSRF_TOKEN_HEADER, token);
        }

        Ok(headers)
    }
}

fn non_empty(params: &[(String, String)]) -> Option<&[(String, String)]> {
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

/// Flatten a JSON object into wire parameters. Booleans become `1`/`0`,
/// numbers plain decimals; nulls are dropped.
fn encode_params(params: &Value) -> Vec<(String, String)> {
    let Some(object) = params.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let encoded = match value {
                Value::Null => return None,
                Value::Bool(true) => "1".to_string(),
                Value::Bool(false) => "0".to_string(),
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), encoded))
        })
        .collect()
}

/// Strip the `{"data": ...}` envelope every API response uses.
fn unwrap_envelope(body: &str) -> Result<Value> {
    let mut value: Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("response body is not valid JSON: {e}")))?;

    match value.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(Error::MalformedResponse(
            "response envelope is missing the `data` field".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans_are_coerced_to_numeric_flags() {
        let params = encode_params(&json!({"running": true, "onboot": false}));
        assert!(params.contains(&("running".to_string(), "1".to_string())));
        assert!(params.contains(&("onboot".to_string(), "0".to_string())));
    }

    #[test]
    fn strings_and_numbers_pass_through_unquoted() {
        let params = encode_params(&json!({"vmid": 100, "node": "pve1"}));
        assert!(params.contains(&("vmid".to_string(), "100".to_string())));
        assert!(params.contains(&("node".to_string(), "pve1".to_string())));
    }

    #[test]
    fn nulls_are_dropped() {
        let params = encode_params(&json!({"pool": null, "vmid": 100}));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn non_object_params_encode_to_nothing() {
        assert!(encode_params(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn envelope_yields_inner_payload() {
        let payload = unwrap_envelope(r#"{"data": {"foo": "bar"}}"#).unwrap();
        assert_eq!(payload, json!({"foo": "bar"}));
    }

    #[test]
    fn null_data_is_still_a_payload() {
        assert_eq!(unwrap_envelope(r#"{"data": null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn missing_data_field_is_malformed() {
        let err = unwrap_envelope(r#"{"success": 1}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = unwrap_envelope("<html>gateway error</html>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
