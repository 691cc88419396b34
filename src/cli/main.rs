use clap::{Parser, Subcommand};
use search_console::{
    backend::{HttpBackend, SearchBackend},
    config::Config,
    engine_config::EngineConfig,
    features::FeatureAdmin,
    models::{FeatureForm, ResultType},
    query::Location,
    session::{ResultsView, SearchSession},
    trending::fetch_trending,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "search-admin")]
#[command(about = "Search console admin CLI", long_about = None)]
struct Cli {
    /// Backend base URL (overrides configuration)
    #[arg(short, long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print a page of results
    Search {
        #[arg(value_name = "TERM")]
        term: String,

        #[arg(short = 't', long = "type")]
        result_type: Option<ResultType>,

        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Show the score breakdown of every result
        #[arg(short, long)]
        debug: bool,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the backend for a spelling suggestion
    Spellcheck {
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// Scoring features
    Features {
        #[command(subcommand)]
        command: FeatureCommands,
    },

    /// Engine tuning knobs
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Most searched keywords
    Trending {
        #[arg(short = 't', long = "type")]
        result_type: Option<ResultType>,
    },
}

#[derive(Subcommand)]
enum FeatureCommands {
    /// List registered features
    List,

    /// Print the scoring formula
    Formula,

    /// Add a feature or edit the one with the same name
    Set {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, allow_negative_numbers = true)]
        coefficient: f64,

        #[arg(short = 'l', long)]
        use_log: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print all engine config values
    Get,

    /// Set one engine config value
    Set {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "VALUE", allow_negative_numbers = true)]
        value: f64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        Config::default()
    });
    if let Some(endpoint) = cli.endpoint {
        config.backend.base_url = endpoint;
    }
    search_console::telemetry::init(&config.observability);

    let backend: Arc<dyn SearchBackend> =
        Arc::new(HttpBackend::new(&config.backend, config.access_token())?);

    match cli.command {
        Commands::Search {
            term,
            result_type,
            page,
            debug,
            json,
        } => {
            let mut search_config = config.search.clone();
            search_config.debug_allowed = debug;
            let result_type = result_type.unwrap_or(search_config.default_result_type);

            let (mut session, requests) =
                SearchSession::open(&search_config, Location::with_term(result_type, term));
            if debug {
                let mut admin = FeatureAdmin::new(backend.clone());
                admin.load().await?;
                session.replace_registry(admin.snapshot());
                session.toggle_debug();
            }
            session.settle(backend.as_ref(), requests).await;
            session.set_page(page);

            let view = session.view();
            match &view.results {
                ResultsView::Results { items, .. } if json => {
                    println!("{}", serde_json::to_string_pretty(items)?);
                }
                _ => print!("{}", view),
            }
        }

        Commands::Spellcheck { term } => {
            let suggestion = backend.spell_check(&term).await?;
            println!("{}", suggestion);
        }

        Commands::Features { command } => {
            let mut admin = FeatureAdmin::new(backend.clone());
            admin.load().await?;

            match command {
                FeatureCommands::List => {
                    println!("{:<24} {:>12} {:>8}", "NAME", "COEFFICIENT", "USE LOG");
                    for feature in admin.registry().list() {
                        println!("{:<24} {:>12} {:>8}", feature.name, feature.coefficient, feature.use_log);
                    }
                }
                FeatureCommands::Formula => {
                    println!("{}", admin.registry().render_formula());
                }
                FeatureCommands::Set {
                    name,
                    coefficient,
                    use_log,
                } => {
                    let mode = admin.submit(FeatureForm::new(name, coefficient, use_log)).await?;
                    println!("{:?} ok", mode);
                    println!("{}", admin.registry().render_formula());
                }
            }
        }

        Commands::Config { command } => {
            let mut engine = EngineConfig::new(backend.clone());
            match command {
                ConfigCommands::Get => {
                    for (name, value) in engine.load().await? {
                        println!("{} = {}", name, value);
                    }
                }
                ConfigCommands::Set { name, value } => {
                    engine.set(&name, value).await?;
                    println!("Update successfully!");
                }
            }
        }

        Commands::Trending { result_type } => {
            let result_type = result_type.unwrap_or(config.search.default_result_type);
            for keyword in fetch_trending(backend.as_ref(), result_type).await? {
                println!("{:>6}  {}  {}", keyword.count, keyword.keyword, keyword.location);
            }
        }
    }

    Ok(())
}
