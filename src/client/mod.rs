//! Chat front end: a transcript plus the send flow that talks to the relay.
//!
//! The flow is written once and parameterized by a [`WireContract`] so the
//! same component can speak `message`/`reply` or `prompt`/`response`.

mod transport;

pub use transport::{ClientError, HttpRelay, RelayTransport};

use serde_json::{Map, Value};

use crate::message::Message;

pub const THINKING_INDICATOR: &str = "Gemini is thinking...";
pub const NO_REPLY_PLACEHOLDER: &str = "⚠️ No response from server";
pub const CONNECTION_ERROR_PLACEHOLDER: &str = "⚠️ Error connecting to server.";

/// Field names used on the wire between the front end and the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireContract {
    pub request_field: &'static str,
    pub reply_field: &'static str,
}

impl WireContract {
    /// What `/api/chat` accepts and returns.
    pub const RELAY: WireContract = WireContract { request_field: "message", reply_field: "reply" };
    /// Older front end contract. The relay does not implement it.
    pub const LEGACY: WireContract = WireContract { request_field: "prompt", reply_field: "response" };

    pub fn request_body(&self, text: &str) -> Value {
        let mut body = Map::new();
        body.insert(self.request_field.to_string(), Value::String(text.to_string()));
        Value::Object(body)
    }

    /// The reply text, if the field is a non-empty string.
    pub fn reply_from<'a>(&self, body: &'a Value) -> Option<&'a str> {
        body.get(self.reply_field)?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

impl Default for WireContract {
    fn default() -> Self {
        Self::RELAY
    }
}

/// Rendering hooks for whatever displays the transcript.
pub trait TranscriptView {
    /// Called after every transcript update.
    fn scroll_to_latest(&mut self, transcript: &[Message]);

    fn busy_changed(&mut self, _busy: bool) {}
}

#[derive(Debug, Default)]
pub struct NoopView;

impl TranscriptView for NoopView {
    fn scroll_to_latest(&mut self, _transcript: &[Message]) {}
}

pub struct Conversation<T, V> {
    transport: T,
    view: V,
    contract: WireContract,
    transcript: Vec<Message>,
    input: String,
    busy: bool,
}

impl<T: RelayTransport, V: TranscriptView> Conversation<T, V> {
    pub fn new(transport: T, view: V) -> Self {
        Self::with_contract(transport, view, WireContract::RELAY)
    }

    pub fn with_contract(transport: T, view: V, contract: WireContract) -> Self {
        Self {
            transport,
            view,
            contract,
            transcript: Vec::new(),
            input: String::new(),
            busy: false,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn can_send(&self) -> bool {
        !self.busy
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn contract(&self) -> WireContract {
        self.contract
    }

    /// Send whatever is in the input buffer. Enter and the send button both land here.
    pub async fn submit(&mut self) -> bool {
        let text = self.input.clone();
        self.send(&text).await
    }

    /// Run one chat turn. Returns `false` when nothing was sent.
    ///
    /// Never fails: transport and decode errors become an assistant bubble.
    pub async fn send(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || !self.can_send() {
            return false;
        }

        self.push(Message::user(text));
        self.set_busy(true);

        let content = match self.transport.post(self.contract.request_body(text)).await {
            Ok(body) => self
                .contract
                .reply_from(&body)
                .unwrap_or(NO_REPLY_PLACEHOLDER)
                .to_string(),
            Err(e) => {
                tracing::error!(error = %e, "chat error");
                CONNECTION_ERROR_PLACEHOLDER.to_string()
            }
        };
        self.push(Message::assistant(content));

        self.input.clear();
        self.set_busy(false);
        true
    }

    fn push(&mut self, message: Message) {
        self.transcript.push(message);
        self.view.scroll_to_latest(&self.transcript);
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.view.busy_changed(busy);
    }
}
