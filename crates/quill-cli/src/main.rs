//! quill CLI
//!
//! Command-line interface for quill - a local-first content library with
//! tagging, authorship, and full-text search.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quill_core::Store;

mod commands;
mod output;

use commands::extract::ExtractCommands;
use commands::search::SearchArgs;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "quill - local-first content library with search")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a content node
    Add {
        /// Body text; read from stdin when omitted
        content: Option<String>,
        /// Title for the content
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Authoring date (RFC 3339); defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Styles (chapter, blog, post, snippet, tweet)
        #[arg(short, long)]
        style: Vec<String>,
        /// Tags to attach
        #[arg(short, long)]
        tag: Vec<String>,
        /// Authors to credit
        #[arg(short, long)]
        author: Vec<String>,
    },
    /// Register a tag
    Tag {
        /// Tag name; normalized to a slug
        name: String,
    },
    /// Register a style (chapter, blog, post, snippet, tweet)
    Style {
        name: String,
    },
    /// Register an author
    Author {
        /// Author name; normalized to a slug
        name: String,
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        twitter: Option<String>,
        #[arg(long)]
        substack: Option<String>,
        #[arg(long)]
        reddit: Option<String>,
    },
    /// Register a link
    Link {
        url: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Attach metadata to a content node
    Attach {
        #[command(subcommand)]
        command: AttachCommands,
    },
    /// Relate two content nodes (snippet_of, related_to)
    Relate {
        src: String,
        relation: String,
        dst: String,
    },
    /// Show a node by id or slug
    Show {
        id: String,
    },
    /// Search content
    Search(SearchArgs),
    /// Derive new content from an existing node
    Extract {
        #[command(subcommand)]
        command: ExtractCommands,
    },
    /// Combine content nodes into one longer piece
    Combine {
        /// Source content ids, in order
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(short = 'T', long)]
        title: String,
        #[arg(short, long)]
        style: Vec<String>,
        #[arg(long, default_value = "\n\n---\n\n")]
        separator: String,
    },
    /// Rebuild the search index from the node store
    Reindex,
    /// Show store status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AttachCommands {
    /// Attach a tag to a content node
    Tag { content_id: String, tag: String },
    /// Credit an author on a content node
    Author { content_id: String, author: String },
    /// Associate a URL with a content node
    Url {
        content_id: String,
        url: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config doesn't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let store = Store::open()?;

    match cli.command {
        Commands::Add {
            content,
            title,
            date,
            style,
            tag,
            author,
        } => commands::content::add(&store, content, title, date, style, tag, author, &output),
        Commands::Tag { name } => commands::tag::register(&store, &name, &output),
        Commands::Style { name } => commands::style::register(&store, &name, &output),
        Commands::Author {
            name,
            linkedin,
            twitter,
            substack,
            reddit,
        } => commands::author::register(&store, &name, linkedin, twitter, substack, reddit, &output),
        Commands::Link {
            url,
            title,
            description,
        } => commands::link::register(&store, &url, title, description, &output),
        Commands::Attach { command } => handle_attach_command(command, &store, &output),
        Commands::Relate { src, relation, dst } => {
            commands::content::relate(&store, &src, &relation, &dst, &output)
        }
        Commands::Show { id } => commands::content::show(&store, &id, &output),
        Commands::Search(args) => commands::search::run(&store, args, &output),
        Commands::Extract { command } => commands::extract::run(&store, command, &output),
        Commands::Combine {
            ids,
            title,
            style,
            separator,
        } => commands::extract::combine(&store, &ids, &title, &style, &separator, &output),
        Commands::Reindex => commands::status::reindex(&store, &output),
        Commands::Status => commands::status::show(&store, &output),
        Commands::Config { .. } => unreachable!(), // handled above
    }
}

fn handle_attach_command(command: AttachCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        AttachCommands::Tag { content_id, tag } => {
            commands::content::attach_tag(store, &content_id, &tag, output)
        }
        AttachCommands::Author { content_id, author } => {
            commands::content::attach_author(store, &content_id, &author, output)
        }
        AttachCommands::Url {
            content_id,
            url,
            title,
            description,
        } => commands::content::attach_url(store, &content_id, &url, title, description, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
