use clap::{Args, Parser, Subcommand};

use crate::cache::DEFAULT_CAPACITY;
use crate::discover::DEFAULT_TOP;

/// Find educational videos and recommended books for a topic.
///
/// Video search needs `YOUTUBE_API_KEY`; book catalogs need no credentials.
#[derive(Parser, Debug)]
#[command(name = "studyscout", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ranked educational videos
    Videos(QueryArgs),
    /// Recommended books (first catalog with results wins)
    Books(QueryArgs),
    /// Public-domain ebooks with PDF/EPUB/text download links
    Ebooks(QueryArgs),
    /// Videos and books together as one report
    Discover {
        #[command(flatten)]
        args: QueryArgs,
        /// Number of videos in the top strip
        #[arg(long, default_value_t = DEFAULT_TOP, value_parser = at_least_one)]
        top: usize,
    },
    /// Top videos for a few fixed popular categories
    Popular {
        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Read one topic per line from stdin and print a report for each
    Session {
        /// Number of videos in the top strip
        #[arg(long, default_value_t = DEFAULT_TOP, value_parser = at_least_one)]
        top: usize,
        /// Distinct recent topics whose book results are remembered
        #[arg(long, default_value_t = DEFAULT_CAPACITY, value_parser = at_least_one)]
        cache_size: usize,
        /// Print one JSON report per line instead of Markdown
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Topic to search for; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
    /// Print JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    pub fn joined(&self) -> String {
        self.query.join(" ")
    }
}

fn at_least_one(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
