//! Command-line definitions

use crate::core::{Category, Priority, Status};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ticket-desk - support ticket desk over a simulated backend
#[derive(Parser, Debug)]
#[command(name = "ticket-desk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./ticket-desk.toml or the user config dir)
    #[arg(short, long, global = true, env = "TICKET_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tickets with filters and pagination
    List {
        /// Only these statuses (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<Status>,

        /// Only these priorities (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        priority: Vec<Priority>,

        /// Only these categories (comma separated)
        #[arg(long, value_delimiter = ',')]
        category: Vec<Category>,

        /// Only tickets assigned to this agent id
        #[arg(short, long)]
        assignee: Option<String>,

        /// Case-insensitive text in subject, description or customer name
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Page number (clamped to the last page)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Tickets per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Also write the full filtered list to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show one ticket with its comments
    Show {
        /// Ticket ID
        ticket: String,
    },

    /// Show the kanban board
    Board {
        /// Use compact view
        #[arg(long)]
        compact: bool,
    },

    /// Move a ticket to another column, or within its column
    Move {
        /// Ticket ID
        ticket: String,

        /// Target status
        to: Status,

        /// Position in the target column (0 = top; default: bottom)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Update ticket fields
    Update {
        /// Ticket ID
        ticket: String,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<Status>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        category: Option<Category>,

        /// Assign to an agent, as ID:NAME
        #[arg(long, conflicts_with = "unassign")]
        assign: Option<String>,

        /// Remove the current assignee
        #[arg(long)]
        unassign: bool,
    },

    /// Add a comment to a ticket
    Comment {
        /// Ticket ID
        ticket: String,

        /// Comment text
        text: String,
    },

    /// Create a new ticket
    Create {
        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        description: String,

        #[arg(long, default_value_t = Category::Technical)]
        category: Category,

        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,

        #[arg(long, default_value = "")]
        customer_name: String,

        #[arg(long, default_value = "")]
        customer_email: String,
    },

    /// Show dashboard statistics
    Stats,
}
