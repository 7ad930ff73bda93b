//! Utility functions

use crate::errors::{Error, Result};
use crate::models::DateWindow;
use time::format_description::well_known::Rfc3339;
use time::{Date, PrimitiveDateTime, Time};

/// Extract header value as string
pub fn header_str(headers: &http::HeaderMap, name: &str) -> Option<String> {
    headers.get(name)?.to_str().ok().map(|s| s.to_string())
}

/// Generate a new request ID
pub fn generate_request_id() -> String {
    format!("sdk-{}", uuid::Uuid::new_v4())
}

/// URL encode a path segment
pub fn encode_path(s: &str) -> String {
    use percent_encoding::{AsciiSet, CONTROLS};

    // RFC 3986 unreserved characters pass through; anything that would change
    // the meaning of the path is escaped.
    const FRAGMENT: &AsciiSet = &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'<')
        .add(b'>')
        .add(b'`')
        .add(b'#')
        .add(b'?')
        .add(b'{')
        .add(b'}')
        .add(b'/')
        .add(b'%')
        .add(b'+')
        .add(b'|');

    percent_encoding::utf8_percent_encode(s, FRAGMENT).to_string()
}

/// Split `[start, end)` into consecutive one-day windows
///
/// Each window runs from midnight UTC of one day to midnight UTC of the next,
/// formatted as RFC 3339 (`2024-08-26T00:00:00Z`), which is what the `since`
/// and `before` filters of the messages and campaigns endpoints accept.
/// Returns an empty list when `end` is not after `start`.
///
/// # Example
///
/// ```
/// use mainstay_sdk::daily_windows;
/// use time::macros::date;
///
/// let windows = daily_windows(date!(2024 - 08 - 26), date!(2024 - 08 - 28)).unwrap();
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[0].since, "2024-08-26T00:00:00Z");
/// assert_eq!(windows[1].before, "2024-08-28T00:00:00Z");
/// ```
pub fn daily_windows(start: Date, end: Date) -> Result<Vec<DateWindow>> {
    let mut windows = Vec::new();
    let mut day = start;
    while day < end {
        let next = day
            .next_day()
            .ok_or_else(|| Error::Config(format!("no day after {}", day)))?;
        windows.push(DateWindow {
            since: midnight_utc(day)?,
            before: midnight_utc(next)?,
        });
        day = next;
    }
    Ok(windows)
}

fn midnight_utc(day: Date) -> Result<String> {
    PrimitiveDateTime::new(day, Time::MIDNIGHT)
        .assume_utc()
        .format(&Rfc3339)
        .map_err(|e| Error::Other(format!("Failed to format date: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_header_str() {
        let mut headers = http::HeaderMap::new();
        let _ = headers.insert("x-request-id", http::HeaderValue::from_static("sdk-1"));

        assert_eq!(header_str(&headers, "x-request-id"), Some("sdk-1".to_string()));
        assert_eq!(header_str(&headers, "etag"), None);
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("4045551234"), "4045551234");
        assert_eq!(encode_path("ahd2b33d72814c61b"), "ahd2b33d72814c61b");
        assert_eq!(encode_path("+14045551234"), "%2B14045551234");
        assert_eq!(encode_path("crm id/1"), "crm%20id%2F1");
        assert_eq!(encode_path("my-key_1.2"), "my-key_1.2");
    }

    #[test]
    fn test_request_id_prefix() {
        let id = generate_request_id();
        assert!(id.starts_with("sdk-"));
        assert_ne!(id, generate_request_id());
    }

    #[test]
    fn test_daily_windows_span_month_end() {
        let windows = daily_windows(date!(2024 - 08 - 30), date!(2024 - 09 - 02)).unwrap();
        let pairs: Vec<(&str, &str)> = windows
            .iter()
            .map(|w| (w.since.as_str(), w.before.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("2024-08-30T00:00:00Z", "2024-08-31T00:00:00Z"),
                ("2024-08-31T00:00:00Z", "2024-09-01T00:00:00Z"),
                ("2024-09-01T00:00:00Z", "2024-09-02T00:00:00Z"),
            ]
        );
    }

    #[test]
    fn test_daily_windows_empty_range() {
        assert!(daily_windows(date!(2024 - 08 - 26), date!(2024 - 08 - 26))
            .unwrap()
            .is_empty());
        assert!(daily_windows(date!(2024 - 08 - 27), date!(2024 - 08 - 26))
            .unwrap()
            .is_empty());
    }
}
