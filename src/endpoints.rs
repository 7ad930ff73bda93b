//! API endpoint URL construction

use crate::util::encode_path;

/// Endpoint builder
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Create a new endpoints builder
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without the trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the full URL for a path relative to the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // Connection test
    pub fn auth_valid(&self) -> String {
        self.url("auth_valid")
    }

    // Contacts
    pub fn contact(&self, id: &str) -> String {
        self.url(&format!("contacts/{}/", encode_path(id)))
    }

    pub fn contacts(&self) -> String {
        self.url("contacts/")
    }

    // Fields
    pub fn custom_fields(&self) -> String {
        self.url("custom_fields")
    }

    pub fn custom_values(&self) -> String {
        self.url("custom_values")
    }

    pub fn default_fields(&self) -> String {
        self.url("default_fields")
    }

    // Campaigns
    pub fn campaigns(&self) -> String {
        self.url("campaigns/")
    }

    pub fn campaign(&self, id: &str) -> String {
        self.url(&format!("campaigns/{}/", encode_path(id)))
    }

    // Messages
    pub fn messages(&self) -> String {
        self.url("messages/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let endpoints = Endpoints::new("https://api.admithub.com");

        assert_eq!(endpoints.auth_valid(), "https://api.admithub.com/auth_valid");
        assert_eq!(
            endpoints.contact("4045551234"),
            "https://api.admithub.com/contacts/4045551234/"
        );
        assert_eq!(endpoints.contacts(), "https://api.admithub.com/contacts/");
        assert_eq!(
            endpoints.campaign("camp 1"),
            "https://api.admithub.com/campaigns/camp%201/"
        );
        assert_eq!(endpoints.messages(), "https://api.admithub.com/messages/");
    }

    #[test]
    fn test_trailing_slash() {
        let endpoints = Endpoints::new("https://api.admithub.com/");
        assert_eq!(endpoints.custom_fields(), "https://api.admithub.com/custom_fields");
        assert_eq!(endpoints.url("/default_fields"), "https://api.admithub.com/default_fields");
    }
}
