//! Client library for the Proxmox VE REST API.
//!
//! Authenticates against a cluster endpoint with a username and password,
//! holds the issued ticket and CSRF prevention token, and exposes the
//! cluster as a small resource hierarchy: client → node → VM. Every
//! resource shares the same four verbs (`get`, `create`, `set`, `delete`),
//! dispatched through one authenticated session that routes parameters,
//! attaches the auth headers, and unwraps the `{"data": ...}` envelope
//! the API puts around every payload.
//!
//! # Quick start
//!
//! ```no_run
//! use pve_client::{ApiResource, PveClient};
//! use serde_json::json;
//!
//! # async fn demo() -> pve_client::Result<()> {
//! let client = PveClient::builder("pve.example.com:8006")
//!     .tls_verify(false)
//!     .login("root", "secret")
//!     .await?;
//!
//! let node = client.node("pve1");
//! let vm = node.vm(100);
//!
//! let status = vm.get("status/current", None).await?;
//! println!("status = {status}");
//!
//! vm.create("status/start", None).await?;
//! vm.set("config", Some(&json!({"onboot": true}))).await?;
//! # Ok(()) }
//! ```
//!
//! Payloads are [`serde_json::Value`]: the remote schema depends on the
//! resource type and is not modeled here. The one exception is the ticket
//! response, which is decoded into typed auth state internally.

mod client;
mod http;
mod node;
mod session;
mod vm;

pub mod error;
pub mod resource;

pub use client::{ClientBuilder, PveClient};
pub use error::{Error, Result};
pub use node::Node;
pub use resource::ApiResource;
pub use session::Session;
pub use vm::Vm;
