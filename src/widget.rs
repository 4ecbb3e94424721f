use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement};

use crate::config::{SessionTransport, WidgetConfig};
use crate::dom;
use crate::markdown;
use crate::protocol::Sender;
use crate::session::{get_or_create_session_id, SessionStore};
use crate::transport::ChatTransport;

/// Element ids the host page must provide.
pub const PANEL_ID: &str = "chatPanel";
pub const LAUNCHER_ID: &str = "chatLauncher";
pub const MESSAGES_ID: &str = "messagesContainer";
pub const INPUT_ID: &str = "messageInput";
pub const SEND_BUTTON_ID: &str = "sendButton";

/// Transient placeholder content shown while a reply is in flight.
pub const THINKING_TEXT: &str = "Thinking...";
/// Final placeholder content when the chat request fails.
pub const APOLOGY_TEXT: &str =
    "Sorry, something went wrong while reaching the server. Please try again.";

const HIDDEN_CLASS: &str = "hidden";

/// The chat widget controller. Cheap to clone; clones share the same
/// underlying state, which is how event closures hold on to it.
#[derive(Clone)]
pub struct ChatWidget {
    inner: Rc<WidgetInner>,
}

struct WidgetInner {
    document: Document,
    config: WidgetConfig,
    transport: Box<dyn ChatTransport>,
    session_id: Option<String>,
    panel: HtmlElement,
    messages: Element,
    input: HtmlTextAreaElement,
    next_handle: Cell<u64>,
}

/// Handle to one rendered message. Placeholder replacement is keyed by
/// this handle, never by searching content, so concurrent exchanges
/// cannot disturb each other's entries.
pub struct MessageHandle {
    element: Element,
}

impl MessageHandle {
    pub fn element_id(&self) -> String {
        self.element.id()
    }
}

impl ChatWidget {
    /// Look up the widget's elements and resolve the session identifier.
    /// A broken store degrades to a fresh unpersisted id; missing markup
    /// is an error.
    pub fn mount(
        document: Document,
        config: WidgetConfig,
        transport: Box<dyn ChatTransport>,
        store: &dyn SessionStore,
    ) -> Result<Self, JsValue> {
        let session_id = match config.session_transport {
            SessionTransport::None => None,
            SessionTransport::Query | SessionTransport::Body => {
                Some(match get_or_create_session_id(store) {
                    Ok(id) => id,
                    Err(e) => {
                        log::warn!("session storage unavailable, using one-off id: {}", e);
                        uuid::Uuid::new_v4().to_string()
                    }
                })
            }
        };

        let panel = dom::get_html_element_by_id(&document, PANEL_ID)?;
        let messages = dom::get_element_by_id(&document, MESSAGES_ID)?;
        let input = dom::get_textarea_by_id(&document, INPUT_ID)?;

        Ok(Self {
            inner: Rc::new(WidgetInner {
                document,
                config,
                transport,
                session_id,
                panel,
                messages,
                input,
                next_handle: Cell::new(0),
            }),
        })
    }

    /// Wire up the launcher, the send button, and the Enter key.
    pub fn attach(&self) -> Result<(), JsValue> {
        let launcher = dom::get_element_by_id(&self.inner.document, LAUNCHER_ID)?;
        let widget = self.clone();
        let closure = Closure::wrap(Box::new(move || widget.toggle()) as Box<dyn FnMut()>);
        launcher.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        let send_btn = dom::get_element_by_id(&self.inner.document, SEND_BUTTON_ID)?;
        let widget = self.clone();
        let closure = Closure::wrap(Box::new(move || {
            let widget = widget.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = widget.submit_input().await {
                    log::error!("Failed to send message: {:?}", e);
                }
            });
        }) as Box<dyn FnMut()>);
        send_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        let widget = self.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                let widget = widget.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = widget.submit_input().await {
                        log::error!("Failed to send message: {:?}", e);
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        self.inner
            .input
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    /// Flip panel visibility. On becoming visible, focus the input and
    /// scroll the message list to the latest entry.
    pub fn toggle(&self) {
        let panel: &Element = &self.inner.panel;
        if dom::has_class(panel, HIDDEN_CLASS) {
            dom::remove_class(panel, HIDDEN_CLASS);
            let _ = self.inner.input.focus();
            dom::scroll_to_bottom(&self.inner.messages);
        } else {
            dom::add_class(panel, HIDDEN_CLASS);
        }
    }

    pub fn is_open(&self) -> bool {
        !dom::has_class(&self.inner.panel, HIDDEN_CLASS)
    }

    /// Read the input, clear it, and send its content.
    pub async fn submit_input(&self) -> Result<(), JsValue> {
        let text = self.inner.input.value();
        if text.trim().is_empty() {
            return Ok(());
        }
        self.inner.input.set_value("");
        self.send_message(&text).await
    }

    /// Send one message: optimistic user entry, thinking placeholder,
    /// then resolve or fail the placeholder when the request settles.
    /// Blank input is silently ignored.
    pub async fn send_message(&self, text: &str) -> Result<(), JsValue> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        self.append_message(Sender::User, trimmed, false)?;
        let placeholder = self.append_message(Sender::Bot, THINKING_TEXT, true)?;

        let inner = &self.inner;
        match inner
            .transport
            .send_chat(trimmed, inner.session_id.as_deref())
            .await
        {
            Ok(reply) => self.resolve_placeholder(&placeholder, &reply)?,
            Err(e) => {
                log::error!("chat request failed: {}", e);
                self.fail_placeholder(&placeholder)?;
            }
        }
        dom::scroll_to_bottom(&inner.messages);
        Ok(())
    }

    /// Replace the message list with the server's history, in
    /// server-supplied order. Transport failure is logged and leaves the
    /// panel empty.
    pub async fn load_history(&self) -> Result<(), JsValue> {
        let inner = &self.inner;
        let history = match inner
            .transport
            .fetch_history(inner.session_id.as_deref())
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                log::error!("failed to load chat history: {}", e);
                return Ok(());
            }
        };

        dom::clear_element(&inner.messages);
        for message in history {
            self.append_message(message.sender, &message.content, false)?;
        }
        dom::scroll_to_bottom(&inner.messages);
        Ok(())
    }

    /// Append one message entry and return its handle. Finalized bot
    /// messages render as markdown (when enabled); placeholders and user
    /// input render as escaped text.
    pub fn append_message(
        &self,
        sender: Sender,
        content: &str,
        pending: bool,
    ) -> Result<MessageHandle, JsValue> {
        let inner = &self.inner;
        let handle_no = inner.next_handle.get();
        inner.next_handle.set(handle_no + 1);

        let msg_div = inner.document.create_element("div")?;
        let mut class = format!("message {}", sender.as_class());
        if pending {
            class.push_str(" pending");
        }
        msg_div.set_class_name(&class);
        msg_div.set_id(&format!("chatMsg-{}", handle_no));

        let body = self.message_body(sender, content, pending);
        msg_div.set_inner_html(&format!(r#"<div class="message-content">{}</div>"#, body));

        inner.messages.append_child(&msg_div)?;
        dom::scroll_to_bottom(&inner.messages);

        Ok(MessageHandle { element: msg_div })
    }

    fn message_body(&self, sender: Sender, content: &str, pending: bool) -> String {
        let as_markdown = self.inner.config.use_markdown && sender == Sender::Bot && !pending;
        markdown::render_message_content(content, as_markdown)
    }

    fn resolve_placeholder(&self, handle: &MessageHandle, reply: &str) -> Result<(), JsValue> {
        handle
            .element
            .set_class_name(&format!("message {}", Sender::Bot.as_class()));
        self.set_handle_content(handle, self.message_body(Sender::Bot, reply, false))
    }

    fn fail_placeholder(&self, handle: &MessageHandle) -> Result<(), JsValue> {
        handle
            .element
            .set_class_name(&format!("message {} failed", Sender::Bot.as_class()));
        self.set_handle_content(handle, markdown::render_message_content(APOLOGY_TEXT, false))
    }

    fn set_handle_content(&self, handle: &MessageHandle, html: String) -> Result<(), JsValue> {
        if let Some(content_div) = handle.element.query_selector(".message-content")? {
            content_div.set_inner_html(&html);
        }
        Ok(())
    }
}
