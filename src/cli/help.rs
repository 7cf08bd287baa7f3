//! CLI command-name contract for logging, routing and format support.

use crate::classify::ServiceFamily;
use crate::cli::parse::{Commands, ReviewsCommands, VitalsCommands};

/// Dotted command name for logs (e.g. "reviews.list", "vitals.query").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Reviews { command } => format!("reviews.{}", reviews_command_name(command)),
        Commands::Vitals { command } => format!("vitals.{}", vitals_command_name(command)),
    }
}

pub fn reviews_command_name(command: &ReviewsCommands) -> &'static str {
    match command {
        ReviewsCommands::List { .. } => "list",
        ReviewsCommands::Get { .. } => "get",
    }
}

pub fn vitals_command_name(command: &VitalsCommands) -> &'static str {
    match command {
        VitalsCommands::Query { .. } => "query",
    }
}

/// Upstream family the command talks to; drives classifier hints.
pub fn command_family(command: &Commands) -> ServiceFamily {
    match command {
        Commands::Reviews { .. } => ServiceFamily::Publisher,
        Commands::Vitals { .. } => ServiceFamily::Reporting,
    }
}

/// Only flat metric-row families can be rendered as CSV.
pub fn supports_csv(command: &Commands) -> bool {
    matches!(command, Commands::Vitals { .. })
}
