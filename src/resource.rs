//! The request contract shared by every API resource.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::session::Session;

/// Uniform verbs every Proxmox resource exposes.
///
/// Implementors provide their own path and a reference to the owning
/// session; the four verbs dispatch through [`Session::request`] with the
/// action joined onto the resource path. No resource adds error kinds of
/// its own.
#[async_trait]
pub trait ApiResource: Send + Sync {
    /// Session that carries this resource's requests.
    fn session(&self) -> &Session;

    /// Absolute API path of this resource, without the `/api2/json` prefix.
    fn path(&self) -> String;

    /// GET `{path}/{action}`.
    async fn get(&self, action: &str, params: Option<&Value>) -> Result<Value> {
        self.session()
            .request(Method::GET, &join_path(&self.path(), action), params)
            .await
    }

    /// POST `{path}/{action}` with a form-encoded body.
    async fn create(&self, action: &str, params: Option<&Value>) -> Result<Value> {
        self.session()
            .request(Method::POST, &join_path(&self.path(), action), params)
            .await
    }

    /// PUT `{path}/{action}` with a form-encoded body.
    async fn set(&self, action: &str, params: Option<&Value>) -> Result<Value> {
        self.session()
            .request(Method::PUT, &join_path(&self.path(), action), params)
            .await
    }

    /// DELETE `{path}/{action}`. Carries no body.
    async fn delete(&self, action: &str) -> Result<Value> {
        self.session()
            .request(Method::DELETE, &join_path(&self.path(), action), None)
            .await
    }
}

/// Join a resource path and an action with exactly one `/` between them,
/// whatever slashes either side already carries.
pub fn join_path(base: &str, action: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        action.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_exactly_one_slash() {
        assert_eq!(join_path("/nodes/pve1", "config"), "/nodes/pve1/config");
        assert_eq!(join_path("/nodes/pve1/", "/config"), "/nodes/pve1/config");
        assert_eq!(join_path("/nodes/pve1", "/config"), "/nodes/pve1/config");
    }

    #[test]
    fn empty_base_keeps_actions_rooted() {
        assert_eq!(join_path("", "access/ticket"), "/access/ticket");
        assert_eq!(join_path("", "/access/ticket"), "/access/ticket");
    }

    #[test]
    fn empty_action_leaves_a_trailing_slash() {
        assert_eq!(join_path("/nodes/pve1", ""), "/nodes/pve1/");
    }
}
