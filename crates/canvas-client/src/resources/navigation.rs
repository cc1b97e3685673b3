use reqwest::Method;
use serde_json::{Value, json};

use crate::client::CanvasClient;
use crate::error::ClientResult;
use crate::models::{NavigationLink, Record, Tab, TabUpdate};
use crate::pagination::Pages;

/// Launch URL of the public redirect LTI tool backing navigation links.
const REDIRECT_TOOL_URL: &str = "https://www.edu-apps.org/redirect";
/// The redirect tool ignores LTI credentials, but Canvas requires both.
const PLACEHOLDER_CREDENTIAL: &str = "N/A";

impl CanvasClient {
    /// Add a course navigation entry labelled `name` that redirects to `url`.
    ///
    /// Returns the created tool record as echoed by the server.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the tool cannot be created.
    pub fn add_navigation_link(
        &self,
        course_id: u64,
        name: &str,
        url: &str,
    ) -> ClientResult<Record> {
        self.create_redirect_tool(course_id, &NavigationLink::new(name, url))
    }

    /// Install a redirect external tool described by `link`.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the tool cannot be created.
    pub fn create_redirect_tool(
        &self,
        course_id: u64,
        link: &NavigationLink,
    ) -> ClientResult<Record> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id, "external_tools"])?;
        tracing::info!(course_id, name = %link.name, target = %link.url, "adding navigation link");
        self.send_json(Method::POST, url, &redirect_tool_payload(link))
    }

    /// Navigation tabs of a course, external tools included.
    #[must_use]
    pub fn list_tabs(&self, course_id: u64) -> Pages<'_, Tab> {
        let id = course_id.to_string();
        Pages::new(
            self,
            self.endpoint(&["api", "v1", "courses", &id, "tabs"]),
            &[("include[]", "external")],
        )
    }

    /// Move or hide a navigation tab.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the update is rejected.
    pub fn update_tab(&self, course_id: u64, tab_id: &str, update: &TabUpdate) -> ClientResult<Tab> {
        let id = course_id.to_string();
        let url = self.endpoint(&["api", "v1", "courses", &id, "tabs", tab_id])?;
        self.send_json(Method::PUT, url, update)
    }
}

fn redirect_tool_payload(link: &NavigationLink) -> Value {
    json!({
        "name": format!("Redirect to {}", link.name),
        "privacy_level": "anonymous",
        "consumer_key": PLACEHOLDER_CREDENTIAL,
        "shared_secret": PLACEHOLDER_CREDENTIAL,
        "url": REDIRECT_TOOL_URL,
        "text": link.name,
        "custom_fields": {
            "url": link.url,
            "new_tab": if link.new_tab { "1" } else { "0" },
        },
        "not_selectable": true,
        "course_navigation": {
            "enabled": true,
            "text": link.name,
            "default": if link.enabled_by_default { "enabled" } else { "disabled" },
        },
        "description": format!("Redirects to {}", link.url),
    })
}
