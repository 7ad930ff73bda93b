//! Basic usage example for the Mainstay SDK
//!
//! Resolves the API token from `MAINSTAY_API_TOKEN`, the OS keyring, or a
//! prompt, then walks through the read-only endpoints.

use mainstay_sdk::{Client, ClientBuilder, ContactFilters, Error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mainstay_sdk=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Initialize the client
    let client = ClientBuilder::from_env()?.build()?;

    // Example 1: Check the token
    println!("=== Example 1: Connection test ===");
    let check = client.test_connection();
    if !check.ok {
        println!("Connection failed: {:?}", check.error);
        return Ok(());
    }
    println!("Connected to organization {:?}", check.org_id);

    // Example 2: Custom fields
    println!("\n=== Example 2: Custom fields ===");
    custom_fields_example(&client)?;

    // Example 3: Look up a contact
    println!("\n=== Example 3: Contact lookup ===");
    contact_example(&client)?;

    // Example 4: First page of contacts as a table
    println!("\n=== Example 4: Contacts table ===");
    let page = client.get_contacts(&ContactFilters {
        texting_status: Some("opted-in".to_string()),
        page: Some(1),
        ..Default::default()
    })?;
    let table = page.to_table();
    println!(
        "{} of {} contacts, columns: {}",
        table.len(),
        page.count.unwrap_or(0),
        table.columns().join(", ")
    );

    Ok(())
}

fn custom_fields_example(client: &Client) -> Result<(), Error> {
    let fields = client.get_custom_fields()?;
    for field in fields.iter().take(5) {
        let values = client.get_custom_values(field)?;
        println!("{}: {} distinct values", field, values.len());
    }
    Ok(())
}

fn contact_example(client: &Client) -> Result<(), Error> {
    let id = std::env::var("MAINSTAY_CONTACT_ID").unwrap_or_else(|_| "4045551234".to_string());

    match client.get_contact(&id, &ContactFilters::default()) {
        Ok(contact) => {
            for (key, value) in &contact {
                println!("  {}: {}", key, value);
            }
        }
        Err(e) if e.is_not_found() => println!("No contact {}", id),
        Err(e) => return Err(e),
    }
    Ok(())
}
