use async_trait::async_trait;
use gloo_net::http::Request;
use thiserror::Error;

use crate::config::{SessionTransport, WidgetConfig};
use crate::protocol::{ChatReply, ChatRequest, HistoryMessage};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// The two backend endpoints, behind a seam so tests can script replies.
/// Futures are not `Send` on wasm, hence `?Send`.
#[async_trait(?Send)]
pub trait ChatTransport {
    /// `POST /chat` with the message text; returns the reply markdown.
    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<String, TransportError>;

    /// `GET /history`; returns messages in server-supplied order.
    async fn fetch_history(
        &self,
        session_id: Option<&str>,
    ) -> Result<Vec<HistoryMessage>, TransportError>;
}

/// Production transport over the browser fetch API.
///
/// Response status codes are not inspected: the body is parsed as JSON
/// either way, and only network or parse failure counts as a transport
/// failure.
pub struct HttpTransport {
    chat_endpoint: String,
    history_endpoint: String,
    session_transport: SessionTransport,
}

impl HttpTransport {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            chat_endpoint: config.chat_endpoint.clone(),
            history_endpoint: config.history_endpoint.clone(),
            session_transport: config.session_transport,
        }
    }

    fn chat_url(&self, session_id: Option<&str>) -> String {
        match self.session_transport {
            SessionTransport::Query => with_session_param(&self.chat_endpoint, session_id),
            SessionTransport::Body | SessionTransport::None => self.chat_endpoint.clone(),
        }
    }

    fn history_url(&self, session_id: Option<&str>) -> String {
        match self.session_transport {
            SessionTransport::None => self.history_endpoint.clone(),
            SessionTransport::Query | SessionTransport::Body => {
                with_session_param(&self.history_endpoint, session_id)
            }
        }
    }

    fn body_session(&self, session_id: Option<&str>) -> Option<String> {
        match self.session_transport {
            SessionTransport::Body => session_id.map(str::to_owned),
            SessionTransport::Query | SessionTransport::None => None,
        }
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<String, TransportError> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.body_session(session_id),
        };

        let response = Request::post(&self.chat_url(session_id))
            .json(&request)
            .map_err(|e| TransportError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(reply.response)
    }

    async fn fetch_history(
        &self,
        session_id: Option<&str>,
    ) -> Result<Vec<HistoryMessage>, TransportError> {
        let response = Request::get(&self.history_url(session_id))
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn with_session_param(endpoint: &str, session_id: Option<&str>) -> String {
    match session_id {
        Some(id) => {
            let separator = if endpoint.contains('?') { '&' } else { '?' };
            format!("{}{}session_id={}", endpoint, separator, id)
        }
        None => endpoint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(mode: SessionTransport) -> HttpTransport {
        HttpTransport::new(&WidgetConfig {
            session_transport: mode,
            ..WidgetConfig::default()
        })
    }

    #[test]
    fn session_param_appended() {
        assert_eq!(
            with_session_param("/history", Some("abc")),
            "/history?session_id=abc"
        );
        assert_eq!(with_session_param("/history", None), "/history");
    }

    #[test]
    fn session_param_respects_existing_query() {
        assert_eq!(
            with_session_param("/history?limit=10", Some("abc")),
            "/history?limit=10&session_id=abc"
        );
    }

    #[test]
    fn query_mode_puts_session_in_urls() {
        let t = transport(SessionTransport::Query);
        assert_eq!(t.chat_url(Some("abc")), "/chat?session_id=abc");
        assert_eq!(t.history_url(Some("abc")), "/history?session_id=abc");
        assert_eq!(t.body_session(Some("abc")), None);
    }

    #[test]
    fn body_mode_puts_session_in_body_and_history_query() {
        let t = transport(SessionTransport::Body);
        assert_eq!(t.chat_url(Some("abc")), "/chat");
        assert_eq!(t.history_url(Some("abc")), "/history?session_id=abc");
        assert_eq!(t.body_session(Some("abc")), Some("abc".to_string()));
    }

    #[test]
    fn none_mode_carries_no_session() {
        let t = transport(SessionTransport::None);
        assert_eq!(t.chat_url(Some("abc")), "/chat");
        assert_eq!(t.history_url(Some("abc")), "/history");
        assert_eq!(t.body_session(Some("abc")), None);
    }
}
