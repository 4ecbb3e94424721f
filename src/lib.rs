//! Floating chat widget for a host web page, compiled to WebAssembly.
//!
//! The host page provides the markup and styling; this crate wires the
//! behavior: toggling the panel, sending messages to the backend, and
//! reloading prior conversation history on page load. Expected element
//! ids:
//!
//! - `chatPanel` — the panel overlay (toggled via a `hidden` class)
//! - `chatLauncher` — the always-visible button toggling the panel
//! - `messagesContainer` — the message list inside the panel
//! - `messageInput` — the textarea for user input
//! - `sendButton` — the send button
//!
//! Call [`init_chat_widget`] once the DOM is ready, optionally passing a
//! JSON configuration string (see [`WidgetConfig`]).

use wasm_bindgen::prelude::*;

mod config;
mod dom;
mod markdown;
mod protocol;
mod session;
mod transport;
mod widget;

pub use config::{SessionTransport, WidgetConfig};
pub use protocol::{ChatReply, ChatRequest, HistoryMessage, Sender};
pub use session::{
    get_or_create_session_id, BrowserStorage, SessionStore, StorageError, SESSION_KEY,
};
pub use transport::{ChatTransport, HttpTransport, TransportError};
pub use widget::{
    ChatWidget, MessageHandle, APOLOGY_TEXT, INPUT_ID, LAUNCHER_ID, MESSAGES_ID, PANEL_ID,
    SEND_BUTTON_ID, THINKING_TEXT,
};

/// Set up panic hook and logging when the module loads.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("sitechat widget loaded");
}

/// Mount the chat widget against the host page markup, attach event
/// handlers, and load prior history.
#[wasm_bindgen]
pub async fn init_chat_widget(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => WidgetConfig::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("invalid widget config: {}", e)))?,
        None => WidgetConfig::default(),
    };

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;

    let transport = HttpTransport::new(&config);
    let store = BrowserStorage::new();

    let chat_widget = ChatWidget::mount(document, config, Box::new(transport), &store)?;
    chat_widget.attach()?;
    chat_widget.load_history().await
}
