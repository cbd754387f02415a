//! ticket-desk - support ticket desk CLI
//!
//! Parses the command line, opens a desk session over the simulated backend
//! and dispatches to the command handlers.

use clap::Parser;
use std::process;
use ticket_desk::cli::handlers::{
    CreateParams, ListParams, UpdateParams, handle_board_command, handle_comment_command,
    handle_create_command, handle_list_command, handle_move_command, handle_show_command,
    handle_stats_command, handle_update_command,
};
use ticket_desk::cli::{Cli, Commands, OutputFormatter};
use ticket_desk::config::DeskConfig;
use ticket_desk::error::{DeskError, Result};
use ticket_desk::session::HelpDesk;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => DeskConfig::load(Some(path.as_path()))?,
        None => DeskConfig::load_default()?,
    };

    let desk = HelpDesk::simulated(&config).await?;
    let result = dispatch_command(&desk, cli.command, formatter).await;
    desk.shutdown();
    result
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("ticket_desk=debug"),
        Err(_) => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch_command(
    desk: &HelpDesk,
    command: Commands,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::List {
            status,
            priority,
            category,
            assignee,
            search,
            page,
            page_size,
            export,
        } => handle_list_command(
            desk,
            &ListParams {
                statuses: status,
                priorities: priority,
                categories: category,
                assignee,
                search,
                page,
                page_size,
                export,
            },
            formatter,
        ),
        Commands::Show { ticket } => handle_show_command(desk, &ticket, formatter),
        Commands::Board { compact } => handle_board_command(desk, compact, formatter),
        Commands::Move { ticket, to, index } => {
            handle_move_command(desk, &ticket, to, index, formatter).await
        },
        Commands::Update {
            ticket,
            subject,
            description,
            status,
            priority,
            category,
            assign,
            unassign,
        } => {
            let params = UpdateParams {
                subject,
                description,
                status,
                priority,
                category,
                assign,
                unassign,
            };
            handle_update_command(desk, &ticket, params, formatter).await
        },
        Commands::Comment { ticket, text } => {
            handle_comment_command(desk, &ticket, &text, formatter).await
        },
        Commands::Create {
            subject,
            description,
            category,
            priority,
            customer_name,
            customer_email,
        } => {
            let params = CreateParams {
                subject,
                description,
                category,
                priority,
                customer_name,
                customer_email,
            };
            handle_create_command(desk, params, formatter).await
        },
        Commands::Stats => handle_stats_command(desk, formatter),
    }
}

/// Handle errors and display them to the user
///
/// Prints the user-facing message and any suggestions; in JSON mode the
/// error is also emitted as a JSON object on stdout.
fn handle_error(error: &DeskError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() && !formatter.is_json() {
        eprintln!("\nSuggestions:");
        for suggestion in &suggestions {
            eprintln!("  • {suggestion}");
        }
    }

    if formatter.is_json() {
        let _ = formatter.json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "kind": error.kind(),
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}
