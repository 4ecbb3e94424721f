use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS class fragment used when rendering a message of this sender.
    pub fn as_class(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// One entry of the `GET /history` response, in server-supplied order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub sender: Sender,
    pub content: String,
}

/// Body of `POST /chat`. The session id is omitted from the JSON entirely
/// when the widget is not correlating sessions through the body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Response body of `POST /chat`; `response` is markdown text.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
