use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ledger_client::api::{InMemoryService, LedgerApiClient, TransactionService};
use ledger_client::commands::{self, summary, Outcome};
use ledger_client::config::{self, Config};
use ledger_client::models::Notification;
use ledger_client::services::LedgerStore;

const PROMPT: &str = "ledger> ";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Logs go to stderr so they never mix with the shell output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ledger_client=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📒 Starting ledger client...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let service: Arc<dyn TransactionService> = match &config.api_url {
        Some(url) => {
            match LedgerApiClient::new(url.clone(), config.api_token.clone(), config.timeout) {
                Ok(client) => {
                    info!("Using transaction service at {}", client.base_url());
                    Arc::new(client)
                }
                Err(e) => {
                    error!("Failed to create API client: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            warn!(
                "{} is not set, keeping transactions in memory for this session",
                config::API_URL_VAR
            );
            Arc::new(InMemoryService::new())
        }
    };

    let (tx, mut notifications) = unbounded_channel();
    let store = LedgerStore::with_notifier(service, tx);

    // A failed first load is reported through a notification; the shell
    // still starts so the user can retry with `refresh`.
    let loaded = store.refresh().await.is_ok();
    print_notifications(&mut notifications);
    if loaded {
        println!("{}", summary::render(&store.metrics()));
    }
    println!("Type `help` for the list of commands.");

    run_shell(&store, &mut notifications).await;

    info!("Ledger client stopped");
    ExitCode::SUCCESS
}

async fn run_shell<S: TransactionService>(
    store: &LedgerStore<S>,
    notifications: &mut UnboundedReceiver<Notification>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", PROMPT);
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        let result = commands::handle_line(store, &line).await;
        let notified = print_notifications(notifications);

        match result {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Output(text)) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            Err(e) if notified => println!("   └─ {}", e),
            Err(e) => println!("❌ {}", e),
        }
    }
}

/// Print queued notifications; true if there were any
fn print_notifications(notifications: &mut UnboundedReceiver<Notification>) -> bool {
    let mut any = false;
    while let Ok(notification) = notifications.try_recv() {
        println!("{}", notification);
        any = true;
    }
    any
}
