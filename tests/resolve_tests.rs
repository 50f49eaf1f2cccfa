// tests/resolve_tests.rs
//! Provider matching: candidate order, attribute and key filtering, fallback

mod support;

use std::sync::Arc;

use cipher_engine::{CipherEngine, EngineError, OpMode, ParameterSpec, Provider, Registry};
use support::{aes_key, init_tracing, new_log, test_service, Behavior};

fn registry_with(providers: Vec<Provider>) -> Arc<Registry> {
    init_tracing();
    let registry = Arc::new(Registry::new());
    for provider in providers {
        registry.install(provider);
    }
    registry
}

#[test]
fn test_exact_service_name_needs_no_configuration() {
    let log = new_log();
    let provider = Provider::new("P1", "exact registration").with_service(test_service(
        "AES/CBC/PKCS5Padding",
        Behavior {
            log: Some(log.clone()),
            ..Behavior::default()
        },
    ));
    let registry = registry_with(vec![provider]);

    let mut engine = CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry).unwrap();
    engine.init(OpMode::Encrypt, &aes_key()).unwrap();

    let events = log.lock().unwrap().events.clone();
    assert_eq!(events, ["init:Encrypt"]);
}

#[test]
fn test_bare_service_gets_mode_and_padding_set_before_init() {
    let log = new_log();
    let provider = Provider::new("P1", "bare registration").with_service(test_service(
        "AES",
        Behavior {
            log: Some(log.clone()),
            ..Behavior::default()
        },
    ));
    let registry = registry_with(vec![provider]);

    let mut engine = CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry).unwrap();
    engine.init(OpMode::Encrypt, &aes_key()).unwrap();

    let events = log.lock().unwrap().events.clone();
    assert_eq!(
        events,
        ["set_mode:CBC", "set_padding:PKCS5Padding", "init:Encrypt"]
    );
}

#[test]
fn test_exact_registration_wins_over_bare() {
    let exact_log = new_log();
    let bare_log = new_log();
    let provider = Provider::new("P1", "both registrations")
        .with_service(test_service(
            "AES",
            Behavior {
                log: Some(bare_log.clone()),
                ..Behavior::default()
            },
        ))
        .with_service(test_service(
            "AES/CBC/PKCS5Padding",
            Behavior {
                log: Some(exact_log.clone()),
                ..Behavior::default()
            },
        ));
    let registry = registry_with(vec![provider]);

    let mut engine = CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry).unwrap();
    engine.init(OpMode::Encrypt, &aes_key()).unwrap();

    assert_eq!(exact_log.lock().unwrap().instances, 1);
    assert_eq!(bare_log.lock().unwrap().instances, 0);
}

#[test]
fn test_attribute_mismatch_is_not_a_match() {
    let provider = Provider::new("P1", "ECB only").with_service(
        test_service("AES", Behavior::default()).supported_modes("ECB"),
    );
    let registry = registry_with(vec![provider]);

    assert!(matches!(
        CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry),
        Err(EngineError::NoSuchAlgorithm(_))
    ));
}

#[test]
fn test_attribute_match_is_case_insensitive() {
    let provider = Provider::new("P1", "lowercase attributes").with_service(
        test_service("AES", Behavior::default())
            .supported_modes("cbc|ecb")
            .supported_paddings("pkcs5padding"),
    );
    let registry = registry_with(vec![provider]);

    assert!(CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry).is_ok());
}

#[test]
fn test_malformed_attribute_pattern_is_a_provider_fault() {
    let provider = Provider::new("P1", "broken pattern")
        .with_service(test_service("AES", Behavior::default()).supported_modes("("));
    let registry = registry_with(vec![provider]);

    assert!(matches!(
        CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry),
        Err(EngineError::ProviderFault(_))
    ));
}

#[test]
fn test_key_incompatible_provider_is_skipped() {
    let p1 = Provider::new("P1", "DES keys only").with_service(
        test_service("AES", Behavior::default()).key_filter(|key| key.algorithm() == "DES"),
    );
    let p2 = Provider::new("P2", "anything goes")
        .with_service(test_service("AES", Behavior::default()));
    let registry = registry_with(vec![p1, p2]);

    let mut engine = CipherEngine::with_registry("AES", registry).unwrap();
    engine.init(OpMode::Encrypt, &aes_key()).unwrap();
    assert_eq!(engine.provider().unwrap().name(), "P2");
}

#[test]
fn test_later_provider_succeeds_after_key_rejection() {
    let p1 = Provider::new("P1", "rejects at init").with_service(test_service(
        "AES",
        Behavior {
            reject_key: true,
            ..Behavior::default()
        },
    ));
    let p2 = Provider::new("P2", "accepts")
        .with_service(test_service("AES", Behavior::default()));
    let registry = registry_with(vec![p1, p2]);

    let mut engine = CipherEngine::with_registry("AES", registry).unwrap();
    engine.init(OpMode::Encrypt, &aes_key()).unwrap();
    assert_eq!(engine.provider().unwrap().name(), "P2");
}

#[test]
fn test_first_init_failure_is_the_one_reported() {
    // P1 fails InvalidKey, P2 fails InvalidAlgorithmParameter; the scan
    // exhausts and the first-seen error wins.
    let p1 = Provider::new("P1", "rejects key").with_service(test_service(
        "AES",
        Behavior {
            reject_key: true,
            ..Behavior::default()
        },
    ));
    let p2 = Provider::new("P2", "rejects params").with_service(test_service(
        "AES",
        Behavior {
            reject_params: true,
            ..Behavior::default()
        },
    ));
    let registry = registry_with(vec![p1, p2]);

    let mut engine = CipherEngine::with_registry("AES", registry).unwrap();
    let err = engine
        .init_with_spec(OpMode::Encrypt, &aes_key(), ParameterSpec::Iv(vec![0; 16]))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidKey(_)), "got {err:?}");
}

#[test]
fn test_unknown_transform_fails_at_construction() {
    let registry = registry_with(vec![support::simple_provider("P1", "DES")]);
    assert!(matches!(
        CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry),
        Err(EngineError::NoSuchAlgorithm(_))
    ));
}

#[test]
fn test_pinned_provider_hit_and_miss() {
    let provider = Arc::new(
        Provider::new("Pinned", "single provider mode")
            .with_service(test_service("AES", Behavior::default())),
    );

    let mut engine =
        CipherEngine::with_provider("AES/CBC/PKCS5Padding", Arc::clone(&provider)).unwrap();
    engine.init(OpMode::Encrypt, &aes_key()).unwrap();
    let bound = engine.provider().unwrap();
    assert_eq!(bound.name(), "Pinned");
    assert_eq!(bound.info(), "single provider mode");

    let err = CipherEngine::with_provider("RSA", provider).unwrap_err();
    match err {
        EngineError::NoSuchAlgorithm(msg) => {
            assert!(msg.contains("Pinned"), "message should name the provider: {msg}");
            assert!(msg.contains("does not provide"), "unexpected message: {msg}");
        }
        other => panic!("expected NoSuchAlgorithm, got {other:?}"),
    }
}

#[test]
fn test_set_mode_rejection_falls_through_to_next_provider() {
    // P1's bare service refuses the mode at configuration time; that is a
    // non-match, not an error, so P2 still gets bound.
    let p1 = Provider::new("P1", "mode refused").with_service(test_service(
        "AES",
        Behavior {
            fail_set_mode: true,
            ..Behavior::default()
        },
    ));
    let p2 = Provider::new("P2", "mode accepted")
        .with_service(test_service("AES", Behavior::default()));
    let registry = registry_with(vec![p1, p2]);

    let engine = CipherEngine::with_registry("AES/CBC/PKCS5Padding", registry).unwrap();
    assert_eq!(engine.provider().unwrap().name(), "P2");
}

#[test]
fn test_provider_priority_order() {
    let first = Provider::new("First", "installed first")
        .with_service(test_service("AES", Behavior::default()));
    let second = Provider::new("Second", "installed second")
        .with_service(test_service("AES", Behavior::default()));
    let registry = registry_with(vec![first, second]);

    let engine = CipherEngine::with_registry("AES", registry).unwrap();
    assert_eq!(engine.provider().unwrap().name(), "First");
}

#[test]
fn test_structural_probe_runs_no_keyed_init() {
    let log = new_log();
    let provider = Provider::new("P1", "probe only").with_service(test_service(
        "AES",
        Behavior {
            log: Some(log.clone()),
            ..Behavior::default()
        },
    ));
    let registry = registry_with(vec![provider]);

    let engine = CipherEngine::with_registry("AES", registry).unwrap();
    assert_eq!(engine.block_size().unwrap(), 16);

    let guard = log.lock().unwrap();
    assert!(guard.instances >= 1);
    assert!(
        guard.events.iter().all(|e| !e.starts_with("init")),
        "probe must not run keyed init: {:?}",
        guard.events
    );
}
