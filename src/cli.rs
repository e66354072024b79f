use clap::{Parser, Subcommand};

/// Community events assistant
#[derive(Debug, Parser)]
#[command(name = "townkrier", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print upcoming events grouped by day
    Events,
    /// Ask the assistant a question about local events
    Ask {
        /// The question to ask
        prompt: String,
        /// Constrain the answer to the event_list JSON schema
        #[arg(long)]
        json: bool,
    },
}
