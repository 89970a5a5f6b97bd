//! Property-based tests for path composition
//!
//! These tests verify that action joining and the resource hierarchy
//! always produce exactly one slash between segments, whatever slash
//! decoration the inputs carry.

use std::sync::OnceLock;

use proptest::prelude::*;
use pve_client::resource::join_path;
use pve_client::{ApiResource, PveClient};

fn client() -> &'static PveClient {
    static CLIENT: OnceLock<PveClient> = OnceLock::new();
    CLIENT.get_or_init(|| {
        PveClient::builder("pve.example.com")
            .connect()
            .expect("offline client should build")
    })
}

/// Generate path segments shaped like node names and action components
fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9-]{0,8}", 0..4)
}

fn assemble_base(segments: &[String], trailing_slash: bool) -> String {
    let mut base = if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    };
    if trailing_slash {
        base.push('/');
    }
    base
}

proptest! {
    /// Joined paths never contain doubled slashes and stay rooted
    #[test]
    fn join_produces_single_separators(
        base_segments in arb_segments(),
        action_segments in arb_segments(),
        base_trailing_slash in any::<bool>(),
        action_leading_slash in any::<bool>(),
    ) {
        let base = assemble_base(&base_segments, base_trailing_slash);
        let mut action = action_segments.join("/");
        if action_leading_slash {
            action.insert(0, '/');
        }

        let joined = join_path(&base, &action);
        prop_assert!(!joined.contains("//"), "doubled slash in {}", joined);
        prop_assert!(joined.starts_with('/'));
    }

    /// Slash decoration on either side never changes the joined path
    #[test]
    fn join_is_decoration_invariant(
        base_segments in arb_segments(),
        action_segments in arb_segments(),
    ) {
        let base = assemble_base(&base_segments, false);
        let action = action_segments.join("/");

        let plain = join_path(&base, &action);
        prop_assert_eq!(&plain, &join_path(&format!("{base}/"), &action));
        prop_assert_eq!(&plain, &join_path(&base, &format!("/{action}")));
        prop_assert_eq!(&plain, &join_path(&format!("{base}/"), &format!("/{action}")));
    }

    /// Node and VM handles compose their API paths from the ancestor chain
    #[test]
    fn hierarchy_paths_compose(
        name in "[a-z][a-z0-9-]{0,10}",
        vmid in 1u32..=999_999_999,
    ) {
        let node = client().node(&name);
        prop_assert_eq!(node.path(), format!("/nodes/{name}"));

        let vm = node.vm(vmid);
        prop_assert_eq!(vm.path(), format!("/nodes/{name}/qemu/{vmid}"));
    }
}
