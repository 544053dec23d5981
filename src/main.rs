mod cli;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use routine_core::{ChatTransport, FilterCriteria, Slot};
use routine_engine::{load_catalog_or_empty, CatalogSource, CatalogStatus, Session, SessionError, SessionEvent};
use routine_llm::{OpenAiClient, ProviderConfig, ProxyTransport};
use routine_server::ServerConfig;
use routine_store::{Database, RoutineMirror, View, ViewPrefs};
use routine_telemetry::{init_telemetry, TelemetryConfig};
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::Level;

use crate::cli::{CatalogArgs, ChatArgs, Cli, Command, GlobalArgs, RoutineCommand, ServeArgs, ViewCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match (&cli.command, cli.global.verbose) {
        (_, true) => Level::DEBUG,
        (Command::Serve(_), false) => Level::INFO,
        _ => Level::WARN,
    };
    let telemetry = TelemetryConfig {
        log_level,
        format: cli.global.log_format,
        ..Default::default()
    };
    init_telemetry(&telemetry).context("failed to install log subscriber")?;

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Chat(args) => chat(&cli.global, args).await,
        Command::Catalog(args) => catalog(&cli.global, args).await,
        Command::Routine(cmd) => routine(&cli.global, cmd).await,
        Command::View(cmd) => view(&cli.global, cmd),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = ServerConfig {
        port: args.port,
        provider: ProviderConfig {
            api_url: args.api_url,
            model: args.model,
            ..Default::default()
        },
        ..Default::default()
    };
    let handle = routine_server::start(config, SecretString::from(args.api_key))
        .await
        .context("failed to start chat proxy")?;
    println!("chat proxy listening on http://0.0.0.0:{}/api/chat", handle.port);

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl+c")?;
    tracing::info!("shutting down");
    Ok(())
}

/// Open the routine store; when that fails the session still runs, it just
/// forgets the routine on exit.
fn open_store(global: &GlobalArgs) -> anyhow::Result<Database> {
    let path = global.db.clone().unwrap_or_else(default_db_path);
    match Database::open(&path) {
        Ok(db) => Ok(db),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "routine store unavailable, changes will not be saved");
            eprintln!("warning: could not open {}; the routine will not be saved", path.display());
            Database::in_memory().context("failed to open in-memory store")
        }
    }
}

fn store_label(db: &Database) -> String {
    if db.is_in_memory() {
        "in memory, not saved".to_string()
    } else {
        db.path().display().to_string()
    }
}

fn default_db_path() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".routine")
        .join("routine.db")
}

async fn open_session(global: &GlobalArgs, db: Database) -> anyhow::Result<Session> {
    let (catalog, status) = load_catalog_or_empty(&CatalogSource::parse(&global.catalog)).await;
    if let CatalogStatus::Unavailable { reason } = &status {
        eprintln!("warning: product catalog unavailable ({reason}); product suggestions cannot be added");
    }
    Ok(Session::new(catalog, status, RoutineMirror::new(db)))
}

fn transport(args: &ChatArgs) -> anyhow::Result<Box<dyn ChatTransport>> {
    if !args.direct {
        return Ok(Box::new(ProxyTransport::new(args.proxy_url.clone())?));
    }
    let Some(key) = args.api_key.clone() else {
        bail!("--direct needs an API key (set OPENAI_API_KEY)");
    };
    let config = ProviderConfig {
        model: args.model.clone(),
        ..Default::default()
    };
    Ok(Box::new(OpenAiClient::new(SecretString::from(key), config)?))
}

fn drain(rx: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = rx.try_recv() {
        if let Some(line) = render::event(&event) {
            println!("{line}");
        }
    }
}

async fn chat(global: &GlobalArgs, args: ChatArgs) -> anyhow::Result<()> {
    let transport = transport(&args)?;
    let db = open_store(global)?;
    let mut session = open_session(global, db.clone()).await?;
    let store = store_label(&db);
    let prefs = ViewPrefs::new(db);
    let mut events = session.subscribe();

    println!(
        "session {} via {} · {} products · view: {} · store: {}",
        session.id(),
        transport.name(),
        session.catalog().len(),
        prefs.load(),
        store
    );
    println!("type a message, or /help");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if let Some(command) = line.strip_prefix('/') {
            if !slash_command(&mut session, &prefs, command)? {
                break;
            }
            drain(&mut events);
            continue;
        }

        let pending = match session.begin_turn(line) {
            Ok(pending) => pending,
            Err(SessionError::EmptyInput) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        drain(&mut events);
        let result = transport.complete(pending.messages()).await;
        session.complete_turn(pending, result)?;
        drain(&mut events);
    }
    Ok(())
}

/// Handle a `/command` typed in chat. Returns `false` to end the session.
fn slash_command(session: &mut Session, prefs: &ViewPrefs, command: &str) -> anyhow::Result<bool> {
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit" | "exit"), _, _) => return Ok(false),
        (Some("routine"), _, _) => print!("{}", render::routine(session.routine())),
        (Some("add"), Some(id), _) => match session.add_by_id(id) {
            Ok(slots) if slots.is_empty() => println!("{id} is already in the routine"),
            Ok(slots) => println!("added {id} to {}", join_slots(&slots)),
            Err(e) => println!("{e}"),
        },
        (Some("remove"), Some(slot), Some(id)) => match slot.parse::<Slot>() {
            Ok(slot) if session.remove(slot, id) => println!("removed {id} from {slot}"),
            Ok(slot) => println!("{id} is not in {slot}"),
            Err(e) => println!("{e}"),
        },
        (Some("clear"), _, _) => session.clear_routine(),
        (Some("products"), query, _) => {
            let criteria = query.map_or_else(FilterCriteria::default, |q| FilterCriteria::default().with_query(q));
            for p in session.filter(&criteria) {
                println!("{}", render::product_card(p));
            }
        }
        (Some("export"), path, _) => {
            let path = Path::new(path.unwrap_or(routine_store::export::DEFAULT_EXPORT_FILE));
            session.export(path)?;
            println!("wrote {}", path.display());
        }
        (Some("view"), Some(name), _) => match name.parse::<View>() {
            Ok(view) => {
                prefs.save(view)?;
                println!("view: {view}");
            }
            Err(e) => println!("{e}"),
        },
        _ => println!(
            "commands: /add <id>, /remove <am|pm> <id>, /routine, /clear, /products [text], \
             /export [path], /view <chat|products|routine>, /quit"
        ),
    }
    Ok(true)
}

fn join_slots(slots: &[Slot]) -> String {
    slots.iter().map(Slot::as_str).collect::<Vec<_>>().join(" and ")
}

async fn catalog(global: &GlobalArgs, args: CatalogArgs) -> anyhow::Result<()> {
    let (catalog, status) = load_catalog_or_empty(&CatalogSource::parse(&global.catalog)).await;
    if let CatalogStatus::Unavailable { reason } = status {
        bail!("product catalog unavailable: {reason}");
    }

    if args.facets {
        println!("categories: {}", catalog.categories().join(", "));
        println!("concerns:   {}", catalog.concerns().join(", "));
        return Ok(());
    }

    let mut criteria = FilterCriteria::default();
    if let Some(category) = args.category {
        criteria = criteria.with_category(category);
    }
    if let Some(concern) = args.concern {
        criteria = criteria.with_concern(concern);
    }
    if let Some(query) = args.query {
        criteria = criteria.with_query(query);
    }
    let matches = catalog.filter(&criteria);
    if matches.is_empty() {
        println!("no products match");
    }
    for p in matches {
        println!("{}\n", render::product_card(p));
    }
    Ok(())
}

async fn routine(global: &GlobalArgs, cmd: RoutineCommand) -> anyhow::Result<()> {
    let mut session = open_session(global, open_store(global)?).await?;
    match cmd {
        RoutineCommand::Show => print!("{}", render::routine(session.routine())),
        RoutineCommand::Add { id } => {
            let slots = session.add_by_id(&id)?;
            if slots.is_empty() {
                println!("{id} is already in the routine");
            } else {
                println!("added {id} to {}", join_slots(&slots));
            }
        }
        RoutineCommand::Remove { slot, id } => {
            if !session.remove(slot, &id) {
                bail!("{id} is not in {slot}");
            }
            println!("removed {id} from {slot}");
        }
        RoutineCommand::Clear => session.clear_routine(),
        RoutineCommand::Export { out } => {
            session.export(&out)?;
            println!("wrote {}", out.display());
        }
    }
    Ok(())
}

fn view(global: &GlobalArgs, cmd: ViewCommand) -> anyhow::Result<()> {
    let prefs = ViewPrefs::new(open_store(global)?);
    match cmd {
        ViewCommand::Get => println!("{}", prefs.load()),
        ViewCommand::Set { view } => {
            prefs.save(view)?;
            println!("{view}");
        }
    }
    Ok(())
}
