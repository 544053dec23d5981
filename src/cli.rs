use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use routine_core::Slot;
use routine_store::export::DEFAULT_EXPORT_FILE;
use routine_store::View;
use routine_telemetry::LogFormat;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:8787/api/chat";
pub const DEFAULT_CATALOG: &str = "data/products.json";

#[derive(Debug, Parser)]
#[command(name = "routine", version, about = "Chat with a beauty advisor and build an AM/PM routine")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Catalog JSON file or http(s) URL.
    #[arg(long, global = true, env = "ROUTINE_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: String,

    /// Routine store. Defaults to ~/.routine/routine.db.
    #[arg(long, global = true, env = "ROUTINE_DB")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, env = "ROUTINE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the chat proxy.
    Serve(ServeArgs),
    /// Interactive chat session.
    Chat(ChatArgs),
    /// Browse and filter the product catalog.
    Catalog(CatalogArgs),
    /// Inspect or edit the saved routine.
    #[command(subcommand)]
    Routine(RoutineCommand),
    /// The remembered front-end view.
    #[command(subcommand)]
    View(ViewCommand),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "ROUTINE_PORT", default_value_t = routine_server::server::DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "ROUTINE_MODEL", default_value = routine_llm::openai::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "ROUTINE_API_URL", default_value = routine_llm::openai::DEFAULT_API_URL)]
    pub api_url: String,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Chat endpoint of the proxy.
    #[arg(long, env = "ROUTINE_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    pub proxy_url: String,

    /// Talk to the provider directly instead of through the proxy.
    #[arg(long)]
    pub direct: bool,

    /// Required with --direct.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "ROUTINE_MODEL", default_value = routine_llm::openai::DEFAULT_MODEL)]
    pub model: String,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub concern: Option<String>,

    /// Substring of name, brand or key ingredients.
    #[arg(long, short)]
    pub query: Option<String>,

    /// List the available categories and concerns instead of products.
    #[arg(long)]
    pub facets: bool,
}

#[derive(Debug, Subcommand)]
pub enum RoutineCommand {
    Show,
    /// Add a catalog product to the slots its steps name.
    Add { id: String },
    Remove { slot: Slot, id: String },
    Clear,
    /// Write the routine as JSON.
    Export {
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ViewCommand {
    Get,
    Set { view: View },
}
