use gemini_relay::{
    client::{Conversation, HttpRelay, THINKING_INDICATOR, TranscriptView},
    config::ClientConfig,
    message::{Message, Role},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prints each bubble once; the terminal keeps the latest one in view.
#[derive(Default)]
struct TerminalView {
    printed: usize,
}

impl TranscriptView for TerminalView {
    fn scroll_to_latest(&mut self, transcript: &[Message]) {
        for msg in &transcript[self.printed..] {
            match msg.role {
                Role::User => println!("you > {}", msg.content),
                Role::Assistant => println!("bot > {}", msg.content),
            }
        }
        self.printed = transcript.len();
    }

    fn busy_changed(&mut self, busy: bool) {
        if busy {
            println!("      {THINKING_INDICATOR}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let relay = HttpRelay::new(reqwest::Client::new(), &config.api_url);
    tracing::info!(url = relay.url(), "using relay");

    let mut chat = Conversation::new(relay, TerminalView::default());
    println!("🤖 Tunchik ChatBot (type /quit to exit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        chat.set_input(line);
        chat.submit().await;
    }

    Ok(())
}
