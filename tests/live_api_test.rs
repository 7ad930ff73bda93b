//! Live API tests against a real Mainstay organization
//!
//! Read-only. Skipped unless `MAINSTAY_API_TOKEN` is set, and ignored by default.
//! Run with: MAINSTAY_API_TOKEN=... cargo test --test live_api_test -- --ignored --nocapture

use mainstay_sdk::{ClientBuilder, ContactFilters, MessageFilters, Table, ENV_API_TOKEN};

/// Create a client from the environment, or `None` when no token is configured
fn create_client() -> Option<mainstay_sdk::Client> {
    if std::env::var(ENV_API_TOKEN).is_err() {
        println!("{} not set, skipping", ENV_API_TOKEN);
        return None;
    }
    let client = ClientBuilder::from_env()
        .expect("Invalid MAINSTAY_* environment")
        .user_agent_extra("live-test/1.0")
        .build()
        .expect("Failed to build client");
    Some(client)
}

#[test]
#[ignore]
fn test_live_connection() {
    let Some(client) = create_client() else { return };

    let check = client.test_connection();
    println!("ok={} status={:?} org={:?}", check.ok, check.status_code, check.org_id);
    assert!(check.ok, "connection failed: {:?}", check.error);
}

#[test]
#[ignore]
fn test_live_custom_fields() {
    let Some(client) = create_client() else { return };

    let fields = client.get_custom_fields().expect("Failed to list custom fields");
    println!("{} custom fields", fields.len());

    if let Some(field) = fields.first() {
        let values = client
            .get_custom_values(field)
            .expect("Failed to list custom values");
        println!("{}: {} distinct values", field, values.len());
    }
}

#[test]
#[ignore]
fn test_live_contacts_and_messages() {
    let Some(client) = create_client() else { return };

    let contacts = client
        .get_contacts(&ContactFilters {
            page: Some(1),
            ..Default::default()
        })
        .expect("Failed to list contacts");
    let table = contacts.to_table();
    println!("{} contacts on first page, {} columns", table.len(), table.columns().len());

    let messages = client
        .get_raw("messages/", &mainstay_sdk::Query::new().param("page", 1))
        .expect("Failed to list messages");
    let table = Table::from_value(&messages, "results").expect("Messages were not tabular");
    println!("{} messages on first page", table.len());

    let typed = client
        .get_messages(&MessageFilters::default())
        .expect("Failed to list messages");
    assert_eq!(typed.results.len(), table.len());
}
