//! RocksDB column family definitions.

/// Tenant configuration: tenant_id → TenantConfig
pub const CF_TENANTS: &str = "tenants";

/// Identity records: identity_id → Identity
pub const CF_IDENTITIES: &str = "identities";

/// Natural key index: (tenant_id, customer_id) → identity_id
pub const CF_IDENTITIES_BY_CUSTOMER: &str = "identities_by_customer";

/// Address memberships: (identity_id, address_bytes) → AddressRecord
pub const CF_ADDRESSES: &str = "addresses";

/// Signing key history: (identity_id, sequence) → SigningKeyRecord
pub const CF_SIGNING_KEYS: &str = "signing_keys";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        CF_TENANTS,
        CF_IDENTITIES,
        CF_IDENTITIES_BY_CUSTOMER,
        CF_ADDRESSES,
        CF_SIGNING_KEYS,
    ]
}
