use std::path::{Path, PathBuf};
use std::sync::Arc;

use reelkit_core::capability::stub::AccessEvent;
use reelkit_core::{CapabilityBroker, CoreError, StubCapabilityProvider};

fn broker_with_stub() -> (Arc<StubCapabilityProvider>, CapabilityBroker) {
    let provider = Arc::new(StubCapabilityProvider::new());
    let broker = CapabilityBroker::new(provider.clone());
    (provider, broker)
}

#[tokio::test]
async fn token_round_trip_resolves_to_the_granted_path() {
    let (_provider, broker) = broker_with_stub();

    let token = broker.create_token(Path::new("/media/movies")).expect("grant");
    let handle = broker.activate(&token).await.expect("activate");

    assert_eq!(handle.root, PathBuf::from("/media/movies"));
    assert!(!handle.is_stale);
}

#[tokio::test]
async fn at_most_one_handle_is_active_across_activations() {
    let (provider, broker) = broker_with_stub();

    let token_a = broker.create_token(Path::new("/a")).expect("grant a");
    let token_b = broker.create_token(Path::new("/b")).expect("grant b");

    broker.activate(&token_a).await.expect("activate a");
    broker.activate(&token_b).await.expect("activate b");

    assert_eq!(provider.active_paths(), vec![PathBuf::from("/b")]);

    // The previous handle's release is observed before the next activation.
    assert_eq!(
        provider.access_log(),
        vec![
            AccessEvent::Began(PathBuf::from("/a")),
            AccessEvent::Ended(PathBuf::from("/a")),
            AccessEvent::Began(PathBuf::from("/b")),
        ]
    );
}

#[tokio::test]
async fn release_is_idempotent_and_ignores_unknown_handles() {
    let (provider, broker) = broker_with_stub();

    let token = broker.create_token(Path::new("/a")).expect("grant");
    let handle = broker.activate(&token).await.expect("activate");

    broker.release(&handle).await;
    broker.release(&handle).await;
    broker.release_active().await;

    assert!(broker.active_handle().await.is_none());
    // Exactly one begin and one end despite the repeated releases.
    assert_eq!(
        provider.access_log(),
        vec![
            AccessEvent::Began(PathBuf::from("/a")),
            AccessEvent::Ended(PathBuf::from("/a")),
        ]
    );
}

#[tokio::test]
async fn staleness_is_advisory_not_a_failure() {
    let (provider, broker) = broker_with_stub();

    let token = broker.create_token(Path::new("/moved")).expect("grant");
    provider.mark_stale(Path::new("/moved"));

    let handle = broker.activate(&token).await.expect("stale activates fine");
    assert!(handle.is_stale);
    assert!(broker.active_handle().await.is_some());
}

#[tokio::test]
async fn revoked_tokens_fail_resolution() {
    let (provider, broker) = broker_with_stub();

    let token = broker.create_token(Path::new("/gone")).expect("grant");
    provider.revoke(Path::new("/gone"));

    match broker.activate(&token).await {
        Err(CoreError::CapabilityResolutionFailed(_)) => {}
        other => panic!("expected resolution failure, got {other:?}"),
    }
    assert!(broker.active_handle().await.is_none());
}

#[tokio::test]
async fn denied_access_leaves_no_handle_active() {
    let (provider, broker) = broker_with_stub();

    let token = broker.create_token(Path::new("/deleted")).expect("grant");
    provider.deny_access(Path::new("/deleted"));

    match broker.activate(&token).await {
        Err(CoreError::AccessDenied(_)) => {}
        other => panic!("expected access denial, got {other:?}"),
    }
    assert!(broker.active_handle().await.is_none());
    assert!(provider.active_paths().is_empty());
}

#[tokio::test]
async fn garbage_tokens_fail_resolution() {
    let (_provider, broker) = broker_with_stub();

    match broker.activate(b"not a token").await {
        Err(CoreError::CapabilityResolutionFailed(_)) => {}
        other => panic!("expected resolution failure, got {other:?}"),
    }
}

#[tokio::test]
async fn exhausted_access_budget_denies_activation() {
    let provider = Arc::new(StubCapabilityProvider::new().with_access_budget(1));
    let broker = CapabilityBroker::new(provider.clone());

    let token = broker.create_token(Path::new("/a")).expect("grant");
    broker.activate(&token).await.expect("first activation");

    match broker.activate(&token).await {
        Err(CoreError::AccessDenied(_)) => {}
        other => panic!("expected access denial, got {other:?}"),
    }
    assert!(broker.active_handle().await.is_none());
}
