//! CLI domain: parse, route, help and output only.
//! No domain orchestration; a single route table dispatches to the commands.

mod help;
mod output;
mod parse;
mod route;

pub use help::{command_family, command_name, supports_csv};
pub use output::{emit, OutputOptions, Rendered};
pub use parse::{Cli, Commands, ReviewsCommands, VitalsCommands};
pub use route::{Invocation, RunContext};
