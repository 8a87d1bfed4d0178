use clap::{Parser, Subcommand, ValueEnum};

/// Scrape the diploma portal and serve the records as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, global = true, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Log in once and print the scraped diplomas to stdout
    Fetch {
        /// Group the output by mentor
        #[arg(long)]
        by_mentor: bool,
        /// Only keep mentors, titles or students containing this text
        #[arg(long, requires = "by_mentor")]
        search: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    Pretty,
    Json,
}

fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}

impl Args {
    /// The chosen subcommand, `serve` when none was given.
    pub fn command_or_serve(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
