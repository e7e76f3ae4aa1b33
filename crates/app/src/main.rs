use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::Catalog;
use services::{AppServices, Explainer, SessionController};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const EMBEDDED_CATALOG: &str = include_str!("../assets/catalog.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingConfirmation,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingConfirmation => {
                write!(f, "reset deletes all progress and mistakes; pass --yes to confirm")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    controller: SessionController,
}

impl UiApp for DesktopApp {
    fn catalog(&self) -> Arc<Catalog> {
        self.services.catalog()
    }

    fn explainer(&self) -> Option<Arc<dyn Explainer>> {
        self.services.explainer()
    }

    fn session_controller(&self) -> SessionController {
        self.controller.clone()
    }
}

struct Args {
    db_url: String,
    catalog_path: Option<String>,
    confirmed: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--db <sqlite_url>] [--catalog <path>]");
    eprintln!("  cargo run -p app -- stats [--db <sqlite_url>] [--catalog <path>]");
    eprintln!("  cargo run -p app -- reset [--db <sqlite_url>] --yes");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --catalog <built-in modern history catalog>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_CATALOG, RUST_LOG");
    eprintln!("  QUIZ_AI_API_KEY, QUIZ_AI_BASE_URL, QUIZ_AI_MODEL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Stats,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "stats" => Some(Self::Stats),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut catalog_path = std::env::var("QUIZ_CATALOG")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut confirmed = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => {
                    catalog_path = Some(require_value(args, "--catalog")?);
                }
                "--yes" | "-y" => confirmed = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            catalog_path,
            confirmed,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn load_catalog(path: Option<&str>) -> Result<Arc<Catalog>, Box<dyn std::error::Error>> {
    let catalog = match path {
        Some(path) => {
            info!(path, "loading catalog from file");
            Catalog::load(path)?
        }
        None => Catalog::from_json_str(EMBEDDED_CATALOG)?,
    };
    info!(
        chapters = catalog.chapters().len(),
        questions = catalog.total_question_count(),
        "catalog ready"
    );
    Ok(Arc::new(catalog))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_stats(controller: &SessionController) {
    let stats = controller.stats();
    println!(
        "answered {}/{}  mistakes {}",
        stats.completed, stats.total_questions, stats.wrong
    );
    for overview in controller.chapter_overviews() {
        println!(
            "  {:<40} {:>3} questions  {:>3} mistakes",
            overview.title, overview.question_count, overview.wrong_count
        );
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with('-') => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with('-') {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if cmd == Command::Reset && !parsed.confirmed {
        return Err(ArgsError::MissingConfirmation.into());
    }

    init_tracing();

    let catalog = load_catalog(parsed.catalog_path.as_deref())?;

    // Open + migrate SQLite here so the library crates never touch the filesystem.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, catalog).await?;
    let mut controller = services.session_controller().await;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                controller,
            });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("History Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Stats => {
            print_stats(&controller);
            Ok(())
        }
        Command::Reset => {
            controller.reset_all().await?;
            println!("all progress and mistakes cleared ({})", parsed.db_url);
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
