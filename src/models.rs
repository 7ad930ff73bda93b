//! Data models for the Mainstay SDK
//!
//! Responses stay close to the JSON the API returns. Endpoint methods narrow
//! the raw [`serde_json::Value`] to the shape they promise and fail with
//! [`Error::Deserialize`](crate::Error::Deserialize) when it does not match:
//!
//! * [`Record`] - a single JSON object, such as one contact
//! * [`Page`] - a paginated listing with a `results` array of records
//! * [`ConnectionTest`] - outcome of the credential check
//!
//! Query filters ([`ContactFilters`], [`CampaignFilters`], [`MessageFilters`])
//! serialize only the fields that are set.

use crate::errors::Error;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// A single JSON object returned by the API, keys in response order
pub type Record = serde_json::Map<String, serde_json::Value>;

/// One page of a paginated listing
///
/// # Example
///
/// ```no_run
/// # use mainstay_sdk::{Client, ContactFilters};
/// # fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let page = client.get_contacts(&ContactFilters {
///     texting_status: Some("opted-in".to_string()),
///     ..Default::default()
/// })?;
/// println!("{} contacts in total", page.count.unwrap_or(0));
///
/// let table = page.to_table();
/// table.save_csv("contacts_page_1.csv")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Total number of results across all pages
    #[serde(default)]
    pub count: Option<u64>,
    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page
    pub results: Vec<Record>,
}

impl Page {
    /// Flatten the records on this page into a table
    pub fn to_table(&self) -> Table {
        Table::from_records(&self.results)
    }

    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|next| !next.is_empty())
    }
}

/// Outcome of [`Client::test_connection`](crate::Client::test_connection)
///
/// Never an `Err`: HTTP and transport failures are reported through `ok` and
/// `error` so a caller can branch without error plumbing.
#[derive(Debug)]
pub struct ConnectionTest {
    /// Whether the API accepted the token
    pub ok: bool,
    /// HTTP status, if a response was received
    pub status_code: Option<u16>,
    /// Organization the token belongs to
    pub org_id: Option<String>,
    /// Why the check failed
    pub error: Option<Error>,
}

impl ConnectionTest {
    pub(crate) fn from_response(status: u16, body: &serde_json::Value) -> Self {
        let ok = body.get("ok").and_then(|v| v.as_bool()).unwrap_or(true);
        let org_id = body
            .get("org_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Self {
            ok,
            status_code: Some(status),
            org_id,
            error: None,
        }
    }

    pub(crate) fn failed(error: Error) -> Self {
        Self {
            ok: false,
            status_code: error.status_code(),
            org_id: None,
            error: Some(error),
        }
    }
}

/// Filters for the contacts endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactFilters {
    /// `opted-in`, `opted-out`, or `temp-pause`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texting_status: Option<String>,
    /// Filter by whether the contact can be texted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_text: Option<bool>,
    /// Custom field filter, `Field Name|value`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    /// Include test contacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_test_contacts: Option<bool>,
    /// Include contacts without messaging permission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_nonpermitted_contacts: Option<bool>,
    /// Modified at or after this time (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_since: Option<String>,
    /// Modified before this time (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_before: Option<String>,
    /// Page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Filters for the campaign list
#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignFilters {
    /// Campaigns since this time (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Campaigns before this time (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Campaign script ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Campaign status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// User ID of the scheduling admin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<String>,
    /// Include hidden campaigns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_hidden: Option<bool>,
    /// Include test campaigns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_test: Option<bool>,
    /// Campaigns sent to the contact with this CRM ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_id: Option<String>,
    /// Campaigns sent to the contact with this AdmitHub ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admithub_contact_id: Option<String>,
    /// Page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl CampaignFilters {
    /// Restrict to a date window
    pub fn window(mut self, window: &DateWindow) -> Self {
        self.since = Some(window.since.clone());
        self.before = Some(window.before.clone());
        self
    }
}

/// Filters for the messages listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageFilters {
    /// Messages created since this time (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Messages created before this time (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Messages for the contact with this AdmitHub ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admithub_contact_id: Option<String>,
    /// AdmitHub ID of the message itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admithub_id: Option<String>,
    /// Messages for the contact with this CRM ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_crm_id: Option<String>,
    /// Filter on the sender's test-user flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_user: Option<bool>,
    /// Include messages from test contacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_test_user: Option<bool>,
    /// Page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl MessageFilters {
    /// Restrict to a date window
    pub fn window(mut self, window: &DateWindow) -> Self {
        self.since = Some(window.since.clone());
        self.before = Some(window.before.clone());
        self
    }
}

/// Free-form query parameters, sent in insertion order
///
/// ```
/// use mainstay_sdk::Query;
///
/// let query = Query::new()
///     .param("texting_status", "opted-in")
///     .param("page", 2)
///     .param_opt("custom", None::<&str>);
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(Vec<(String, String)>);

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((name.into(), value.to_string()));
        self
    }

    /// Append a parameter only when a value is present
    pub fn param_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no parameters are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A `[since, before)` interval in RFC 3339, see [`daily_windows`](crate::daily_windows)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// Inclusive start
    pub since: String,
    /// Exclusive end
    pub before: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomFieldsResponse {
    pub custom_fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomValuesResponse {
    pub values: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_deserialize() {
        let page: Page = serde_json::from_value(json!({
            "count": 2,
            "next": "https://api.admithub.com/contacts/?page=2",
            "previous": null,
            "results": [{"admithub_id": "abc123"}, {"admithub_id": "def456"}]
        }))
        .unwrap();

        assert_eq!(page.count, Some(2));
        assert!(page.has_next());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.to_table().columns(), ["admithub_id"]);
    }

    #[test]
    fn test_page_rejects_non_object_results() {
        let result: std::result::Result<Page, _> =
            serde_json::from_value(json!({"results": [1, 2]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_filters_skip_unset_fields() {
        let filters = ContactFilters {
            texting_status: Some("opted-in".to_string()),
            can_text: Some(true),
            page: Some(1),
            ..Default::default()
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            value,
            json!({"texting_status": "opted-in", "can_text": true, "page": 1})
        );
    }

    #[test]
    fn test_message_filters_window() {
        let window = DateWindow {
            since: "2024-08-26T00:00:00Z".to_string(),
            before: "2024-08-27T00:00:00Z".to_string(),
        };
        let filters = MessageFilters::default().window(&window);
        assert_eq!(filters.since.as_deref(), Some("2024-08-26T00:00:00Z"));
        assert_eq!(filters.before.as_deref(), Some("2024-08-27T00:00:00Z"));
    }

    #[test]
    fn test_connection_test_from_response() {
        let test = ConnectionTest::from_response(200, &json!({"ok": true, "org_id": "gsu"}));
        assert!(test.ok);
        assert_eq!(test.org_id.as_deref(), Some("gsu"));
        assert_eq!(test.status_code, Some(200));

        let test = ConnectionTest::from_response(200, &json!({"ok": false}));
        assert!(!test.ok);
    }

    #[test]
    fn test_connection_test_failed() {
        let test = ConnectionTest::failed(Error::Timeout);
        assert!(!test.ok);
        assert_eq!(test.status_code, None);
        assert!(matches!(test.error, Some(Error::Timeout)));
    }
}
