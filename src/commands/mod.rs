//! Line-oriented command shell over the ledger store

pub mod add;
pub mod delete;
pub mod edit;
pub mod help;
pub mod list;
pub mod refresh;
pub mod summary;

use crate::api::TransactionService;
use crate::models::TransactionId;
use crate::services::LedgerStore;

/// What the shell should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text (possibly empty) and read the next line
    Output(String),
    Quit,
}

/// Parse and run one input line.
///
/// `Err` carries a message for the user; store failures have already been
/// reported through the store's notifications by then.
pub async fn handle_line<S: TransactionService>(
    store: &LedgerStore<S>,
    line: &str,
) -> Result<Outcome, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return Ok(Outcome::Output(String::new()));
    };

    if args.first() == Some(&"help") {
        return help::usage(command)
            .map(|usage| Outcome::Output(usage.to_string()))
            .ok_or_else(|| unknown_command(command));
    }

    let output = match command {
        "list" | "ls" => list::execute(store).await,
        "summary" | "sum" => summary::execute(store).await,
        "add" | "new" => add::execute(store, args).await,
        "edit" | "update" => edit::execute(store, args).await,
        "delete" | "rm" => delete::execute(store, args).await,
        "refresh" => refresh::execute(store).await,
        "help" | "?" => Ok(help::execute()),
        "quit" | "exit" => return Ok(Outcome::Quit),
        _ => Err(unknown_command(command)),
    }?;

    Ok(Outcome::Output(output))
}

fn unknown_command(command: &str) -> String {
    format!("Unknown command '{}'. Type `help` to see what is available.", command)
}

/// Resolve a transaction reference: `#3` is the third row of `list`,
/// anything else is taken as a raw id.
pub fn resolve_id<S: TransactionService>(
    store: &LedgerStore<S>,
    reference: &str,
) -> Result<TransactionId, String> {
    let Some(row) = reference.strip_prefix('#') else {
        return Ok(TransactionId::from(reference));
    };

    let transactions = store.transactions();
    row.parse::<usize>()
        .ok()
        .filter(|&n| n >= 1)
        .and_then(|n| transactions.get(n - 1))
        .map(|t| t.id.clone())
        .ok_or_else(|| {
            format!(
                "No row {} in the list ({} transactions)",
                reference,
                transactions.len()
            )
        })
}
