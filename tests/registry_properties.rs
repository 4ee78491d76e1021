mod common;

use link_registry::domain::entities::UrlRecord;
use link_registry::domain::repositories::{PutMode, UrlRepository};
use link_registry::error::RegistryError;
use link_registry::infrastructure::persistence::MemoryUrlRepository;
use link_registry::prelude::{CodeGenerator, RegistryService};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_end_to_end_scenario() {
    let registry = common::memory_registry();

    let first = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap();
    assert!(first.created);
    let code = first.record.short_code.clone();
    assert_eq!(code.len(), 6);

    let again = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap();
    assert!(!again.created);
    assert_eq!(again.record.short_code, code);

    let promo = registry
        .shorten(
            "https://other.com".to_string(),
            Some("promo".to_string()),
            None,
        )
        .await
        .unwrap();
    assert!(promo.created);
    assert_eq!(promo.record.short_code, "promo");

    let taken = registry
        .shorten(
            "https://another.com".to_string(),
            Some("promo".to_string()),
            None,
        )
        .await;
    assert!(matches!(taken.unwrap_err(), RegistryError::KeywordTaken(k) if k == "promo"));

    assert_eq!(registry.resolve(&code).await.unwrap(), "https://example.com");
    assert_eq!(registry.stats(&code).await.unwrap(), 1);

    let info = registry.lookup_by_keyword("promo").await.unwrap();
    assert_eq!(info.long_url, "https://other.com");
    assert_eq!(info.clicks, 0);
}

#[tokio::test]
async fn test_dedup_does_not_reset_clicks() {
    let registry = common::memory_registry();

    let first = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap();
    let code = first.record.short_code;

    registry.resolve(&code).await.unwrap();
    registry.resolve(&code).await.unwrap();

    let again = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap();
    assert!(!again.created);
    assert_eq!(again.record.clicks, 2);
    assert_eq!(registry.stats(&code).await.unwrap(), 2);
}

#[tokio::test]
async fn test_custom_keyword_bypasses_dedup() {
    let registry = common::memory_registry();

    let generated = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap();

    let custom = registry
        .shorten(
            "https://example.com".to_string(),
            Some("mine".to_string()),
            None,
        )
        .await
        .unwrap();
    assert!(custom.created);
    assert_ne!(custom.record.short_code, generated.record.short_code);

    // The generated code stays the dedup answer for this URL.
    let again = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(again.record.short_code, generated.record.short_code);
}

#[tokio::test]
async fn test_keyword_taken_for_any_url() {
    let registry = common::memory_registry();

    registry
        .shorten("https://a.com".to_string(), Some("sale".to_string()), None)
        .await
        .unwrap();

    for url in ["https://a.com", "https://b.com", "https://c.com"] {
        let result = registry
            .shorten(url.to_string(), Some("sale".to_string()), None)
            .await;
        assert!(matches!(result.unwrap_err(), RegistryError::KeywordTaken(_)));
    }

    assert_eq!(
        registry.lookup_by_keyword("sale").await.unwrap().long_url,
        "https://a.com"
    );
}

#[tokio::test]
async fn test_resolve_unknown_code_leaves_state_untouched() {
    let repository = Arc::new(MemoryUrlRepository::new());
    let registry = common::registry_over(repository.clone());

    let result = registry.resolve("nope42").await;
    assert!(matches!(result.unwrap_err(), RegistryError::NotFound(_)));

    assert!(repository.get("nope42").await.unwrap().is_none());
    assert!(matches!(
        registry.stats("nope42").await.unwrap_err(),
        RegistryError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_round_trip_arbitrary_urls() {
    let registry = common::memory_registry();

    let urls = [
        "https://example.com/search?q=rust&lang=en#results",
        "https://例え.jp/パス?クエリ=値",
        "https://example.com/emoji/🦀",
        "not a url at all",
        "mailto:someone@example.com",
        "https://example.com/a%20b/../c",
    ];

    for url in urls {
        let outcome = registry.shorten(url.to_string(), None, None).await.unwrap();
        assert_eq!(registry.resolve(&outcome.record.short_code).await.unwrap(), url);
    }
}

#[tokio::test]
async fn test_creator_address_is_recorded() {
    let registry = common::memory_registry();

    let outcome = registry
        .shorten(
            "https://example.com".to_string(),
            None,
            Some("192.0.2.7".to_string()),
        )
        .await
        .unwrap();

    let record = registry.record(&outcome.record.short_code).await.unwrap();
    assert_eq!(record.ip_address.as_deref(), Some("192.0.2.7"));
}

#[tokio::test]
async fn test_exhausted_keyspace() {
    let generator = CodeGenerator::with_alphabet("x", 1).unwrap();
    let registry = RegistryService::new(Arc::new(MemoryUrlRepository::new()), generator);

    let first = registry
        .shorten("https://one.com".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(first.record.short_code, "x");

    let result = registry
        .shorten("https://two.com".to_string(), None, None)
        .await;
    assert!(matches!(
        result.unwrap_err(),
        RegistryError::ExhaustedKeyspace { .. }
    ));
}

#[tokio::test]
async fn test_generated_code_avoids_custom_keywords() {
    let repository = Arc::new(MemoryUrlRepository::new());
    repository
        .put(UrlRecord::new("a", "https://taken.com", None), PutMode::Reserve)
        .await
        .unwrap();

    let generator = CodeGenerator::with_alphabet("ab", 1).unwrap();
    let registry = RegistryService::new(repository, generator);

    let outcome = registry
        .shorten("https://fresh.com".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(outcome.record.short_code, "b");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_keyword_reservation_has_one_winner() {
    let registry = common::memory_registry();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .shorten(
                        format!("https://site{}.com", i),
                        Some("launch".to_string()),
                        None,
                    )
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(outcome) => {
                assert!(outcome.created);
                winners += 1;
            }
            Err(RegistryError::KeywordTaken(_)) => taken += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(taken, 31);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_auto_shorten_creates_one_record() {
    let registry = common::memory_registry();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .shorten("https://popular.com".to_string(), None, None)
                    .await
            })
        })
        .collect();

    let mut codes = HashSet::new();
    let mut created = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        if outcome.created {
            created += 1;
        }
        codes.insert(outcome.record.short_code);
    }

    assert_eq!(created, 1);
    assert_eq!(codes.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_count_every_click() {
    let registry = common::memory_registry();
    let code = registry
        .shorten("https://example.com".to_string(), None, None)
        .await
        .unwrap()
        .record
        .short_code;

    let handles: Vec<_> = (0..200)
        .map(|_| {
            let registry = registry.clone();
            let code = code.clone();
            tokio::spawn(async move { registry.resolve(&code).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "https://example.com");
    }

    assert_eq!(registry.stats(&code).await.unwrap(), 200);
}
