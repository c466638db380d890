//! Concurrent registrations on the same natural key.

use super::helpers::*;
use crate::*;
use keyreg_storage::{RocksDbStorage, Storage, CF_IDENTITIES};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_registrations_create_one_identity() {
    let (storage, _temp_dir) = create_test_storage();
    let registry = Arc::new(RegistryService::new(
        Arc::clone(&storage),
        RegistryConfig::default(),
    ));

    let handles: Vec<_> = (1..=8u8)
        .map(|seed| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let keypair = caller(seed);
                register(&*registry, "customer-1", &keypair).await.unwrap()
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    // Every caller saw the key minted by whichever registration ran first
    assert!(results.windows(2).all(|pair| pair[0].sign_key == pair[1].sign_key));

    let identity = registry
        .find_identity(TENANT, "customer-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registry.addresses(identity.identity_id).await.unwrap().len(), 8);
    assert_eq!(
        registry
            .signing_keys()
            .history(identity.identity_id)
            .await
            .unwrap()
            .len(),
        1
    );

    let all_identities: Vec<(Vec<u8>, Identity)> =
        storage.get_by_prefix(CF_IDENTITIES, &()).await.unwrap();
    assert_eq!(all_identities.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_customers_register_in_parallel() {
    let (registry, _temp_dir) = create_test_registry();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (1..=8u8)
        .map(|seed| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let keypair = caller(seed);
                let customer_id = format!("customer-{}", seed);
                register(&*registry, &customer_id, &keypair).await.unwrap();
                registry
                    .find_identity(TENANT, &customer_id)
                    .await
                    .unwrap()
                    .unwrap()
                    .identity_id
            })
        })
        .collect();

    let mut ids: Vec<Uuid> = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fresh_tenant_config_written_once() {
    let (inner, _temp_dir) = RocksDbStorage::open_temporary().unwrap();
    let storage = Arc::new(TenantWriteCounter::new(inner));
    let registry = Arc::new(RegistryService::new(
        Arc::clone(&storage),
        RegistryConfig::default(),
    ));

    let handles: Vec<_> = (1..=8u8)
        .map(|seed| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let keypair = caller(seed);
                let customer_id = format!("customer-{}", seed);
                register(&*registry, &customer_id, &keypair).await.unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(storage.committed_tenant_writes(), 1);
    let config = registry.tenants().get(TENANT).await.unwrap().unwrap();
    assert_eq!(config.tenant_id, TENANT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rotate_racing_delete_leaves_no_orphaned_keys() {
    let (registry, _temp_dir) = create_test_registry();
    let registry = Arc::new(registry);

    for round in 0..16u8 {
        let keypair = caller(round + 1);
        register(&*registry, "customer-1", &keypair).await.unwrap();
        let identity_id = registry
            .find_identity(TENANT, "customer-1")
            .await
            .unwrap()
            .unwrap()
            .identity_id;

        let rotator = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.rotate_sign_key(TENANT, "customer-1").await })
        };
        let deleter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.delete(TENANT, "customer-1").await })
        };

        rotator.await.unwrap().unwrap();
        assert!(deleter.await.unwrap().unwrap());

        let history = registry.signing_keys().history(identity_id).await.unwrap();
        assert!(history.is_empty(), "round {} left {} keys", round, history.len());
    }
}
