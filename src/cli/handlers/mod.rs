//! Command handlers
//!
//! Each handler works against an open [`crate::session::HelpDesk`] and
//! writes its result through the [`crate::cli::OutputFormatter`].

mod board;
mod common;
mod create;
mod list;
mod moves;
mod show;
mod stats;
mod update;

pub use board::handle_board_command;
pub use create::{CreateParams, handle_create_command};
pub use list::{ListParams, handle_list_command};
pub use moves::handle_move_command;
pub use show::handle_show_command;
pub use stats::handle_stats_command;
pub use update::{UpdateParams, handle_comment_command, handle_update_command};
