use serde::Deserialize;

/// How the session identifier rides on requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionTransport {
    /// Query-string parameter on both endpoints.
    Query,
    /// Chat request body; history still uses the query string since
    /// `GET /history` has no body.
    Body,
    /// No session correlation and no storage access.
    None,
}

/// Widget configuration, deserialized from the JSON argument of
/// `init_chat_widget`. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub use_markdown: bool,
    pub session_transport: SessionTransport,
    pub chat_endpoint: String,
    pub history_endpoint: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            use_markdown: true,
            session_transport: SessionTransport::Body,
            chat_endpoint: "/chat".to_string(),
            history_endpoint: "/history".to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WidgetConfig::default();
        assert!(config.use_markdown);
        assert_eq!(config.session_transport, SessionTransport::Body);
        assert_eq!(config.chat_endpoint, "/chat");
        assert_eq!(config.history_endpoint, "/history");
    }

    #[test]
    fn parses_partial_json() {
        let config =
            WidgetConfig::from_json(r#"{"useMarkdown":false,"sessionTransport":"query"}"#).unwrap();
        assert!(!config.use_markdown);
        assert_eq!(config.session_transport, SessionTransport::Query);
        assert_eq!(config.chat_endpoint, "/chat");
    }

    #[test]
    fn parses_none_transport() {
        let config = WidgetConfig::from_json(r#"{"sessionTransport":"none"}"#).unwrap();
        assert_eq!(config.session_transport, SessionTransport::None);
    }

    #[test]
    fn parses_custom_endpoints() {
        let config = WidgetConfig::from_json(
            r#"{"chatEndpoint":"/api/chat","historyEndpoint":"/api/history"}"#,
        )
        .unwrap();
        assert_eq!(config.chat_endpoint, "/api/chat");
        assert_eq!(config.history_endpoint, "/api/history");
    }
}
