use capshare_core::{
    publish, Capability, CapabilityRegistry, DuplicatePolicy, HostSlot, ModuleKey, RegistryError,
    SharedRegistry,
};
use std::sync::Arc;

#[derive(Debug)]
struct ExtensionsApi {
    label: &'static str,
}

fn key(namespace: &str, name: &str) -> ModuleKey {
    ModuleKey::new(namespace, name).expect("valid key")
}

#[test]
fn published_object_is_returned_unchanged_by_lookup() {
    let host = Arc::new(SharedRegistry::default());
    let extensions = Arc::new(ExtensionsApi { label: "shared" });

    publish(
        &host,
        "jenkins-cd",
        "js-extensions",
        Capability::new(Arc::clone(&extensions)),
    )
    .expect("publish should succeed");

    let found = host
        .lookup(&key("jenkins-cd", "js-extensions"))
        .expect("capability should be registered");
    let found = found
        .downcast::<ExtensionsApi>()
        .expect("capability should keep its type");
    assert!(Arc::ptr_eq(&found, &extensions));
    assert_eq!(found.label, "shared");
}

#[test]
fn duplicate_key_is_rejected_consistently_under_reject_policy() {
    let host = Arc::new(SharedRegistry::new(DuplicatePolicy::Reject));
    let first = Arc::new(ExtensionsApi { label: "first" });

    publish(&host, "jenkins-cd", "js-extensions", Capability::new(Arc::clone(&first)))
        .expect("first publish");

    for label in ["second", "third"] {
        let err = publish(
            &host,
            "jenkins-cd",
            "js-extensions",
            Capability::new(Arc::new(ExtensionsApi { label })),
        )
        .expect_err("duplicate publish must fail");
        assert_eq!(
            err,
            RegistryError::RegistrationConflict(key("jenkins-cd", "js-extensions"))
        );
    }

    let stored = host
        .lookup(&key("jenkins-cd", "js-extensions"))
        .and_then(|capability| capability.downcast::<ExtensionsApi>())
        .expect("first capability stays registered");
    assert!(Arc::ptr_eq(&stored, &first));
}

#[test]
fn duplicate_key_replaces_consistently_under_overwrite_policy() {
    let host = Arc::new(SharedRegistry::new(DuplicatePolicy::Overwrite));

    for label in ["first", "second", "third"] {
        let api = Arc::new(ExtensionsApi { label });
        publish(&host, "jenkins-cd", "js-extensions", Capability::new(Arc::clone(&api)))
            .expect("overwrite publish");

        let stored = host
            .lookup(&key("jenkins-cd", "js-extensions"))
            .and_then(|capability| capability.downcast::<ExtensionsApi>())
            .expect("latest capability registered");
        assert!(Arc::ptr_eq(&stored, &api));
    }
    assert_eq!(host.len(), 1);
}

#[test]
fn publish_before_host_install_fails_without_partial_registration() {
    let slot = HostSlot::new();
    let api = Capability::new(Arc::new(ExtensionsApi { label: "early" }));

    let err = publish(&slot, "jenkins-cd", "js-extensions", api)
        .expect_err("publish without host must fail");
    assert!(matches!(err, RegistryError::HostUnavailable(_)));

    let registry = Arc::new(SharedRegistry::default());
    slot.install(registry.clone()).expect("install host");
    assert!(registry.is_empty());
    assert!(registry
        .lookup(&key("jenkins-cd", "js-extensions"))
        .is_none());

    publish(
        &slot,
        "jenkins-cd",
        "js-extensions",
        Capability::new(Arc::new(ExtensionsApi { label: "late" })),
    )
    .expect("publish after install");
    assert_eq!(registry.len(), 1);
}

#[test]
fn different_namespaces_do_not_collide() {
    let host = Arc::new(SharedRegistry::default());
    publish(&host, "jenkins-cd", "js-extensions", Capability::new(Arc::new(1_u8)))
        .expect("first namespace");
    publish(&host, "plugin-a", "js-extensions", Capability::new(Arc::new(2_u8)))
        .expect("second namespace");

    let rows = host.snapshot();
    let keys: Vec<&str> = rows.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["jenkins-cd:js-extensions", "plugin-a:js-extensions"]);
}
