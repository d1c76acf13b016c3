const COMMANDS: [(&str, &[&str], &str); 8] = [
    ("list", &["ls"], "list\n  Show every transaction with its row number and id."),
    ("summary", &["sum"], "summary\n  Show balance, income, expense and the income vs expense ratio."),
    (
        "add",
        &["new"],
        "add <amount> <description>\n  Record a transaction. Negative amounts are expenses and may not exceed the balance.\n  Example: add -4.5 Morning coffee",
    ),
    (
        "edit",
        &["update"],
        "edit <#row|id> <amount> [description]\n  Change a transaction. Without a description the current one is kept.\n  Example: edit #2 -60 Groceries",
    ),
    (
        "delete",
        &["rm"],
        "delete <#row|id>\n  Remove a transaction.\n  Example: delete #3",
    ),
    ("refresh", &[], "refresh\n  Reload the list from the server."),
    ("help", &["?"], "help [command]\n  Show this overview, or `<command> help` for details."),
    ("quit", &["exit"], "quit\n  Leave the ledger."),
];

/// Overview of every command
pub fn execute() -> String {
    let mut text = String::from("📖 Ledger commands\n");
    for (name, aliases, usage) in COMMANDS {
        let summary = usage.lines().nth(1).unwrap_or_default().trim();
        let signature = usage.lines().next().unwrap_or(name);
        if aliases.is_empty() {
            text.push_str(&format!("\n  {:<36} {}", signature, summary));
        } else {
            text.push_str(&format!(
                "\n  {:<36} {} (alias: {})",
                signature,
                summary,
                aliases.join(", ")
            ));
        }
    }
    text
}

/// Detailed usage for one command or alias
pub fn usage(command: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|(name, aliases, _)| *name == command || aliases.contains(&command))
        .map(|(_, _, usage)| *usage)
}
