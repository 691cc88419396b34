use search_console::{
    backend::{HttpBackend, SearchBackend},
    config::Config,
    features::FeatureAdmin,
    query::Location,
    session::{FetchRequest, FetchResponse, SearchSession},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
<text>            type <text> and press Enter
:draft <text>     type without submitting
:accept           follow the \"Do you mean\" suggestion
:open <location>  navigate to a location, e.g. /search/doc?q=rust
:back | :forward  history navigation
:page <n>         show page n
:debug            toggle debug mode
:features         reload the feature registry used by debug mode
:help | :quit";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    search_console::telemetry::init(&config.observability);
    tracing::info!("Starting search console v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(backend = %config.backend.base_url, "Backend configured");

    let backend: Arc<dyn SearchBackend> =
        Arc::new(HttpBackend::new(&config.backend, config.access_token())?);

    let start = match std::env::args().nth(1) {
        Some(arg) => Location::parse(&arg, config.search.default_result_type)?,
        None => Location::unset(config.search.default_result_type),
    };

    let (mut session, initial) = SearchSession::open(&config.search, start);
    if config.search.debug_allowed {
        load_features(&backend, &mut session).await;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<FetchResponse>();
    dispatch(&backend, &tx, initial);

    println!("{}", HELP);
    print!("{}", session.view());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let requests = match parse_event(&line) {
                    Event::Quit => break,
                    Event::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    Event::Search(text) => {
                        let mut requests = session.set_draft(text);
                        requests.extend(session.submit());
                        requests
                    }
                    Event::Draft(text) => session.set_draft(text),
                    Event::Accept => session.accept_suggestion(),
                    Event::Open(raw) => match Location::parse(&raw, config.search.default_result_type) {
                        Ok(location) => session.navigate(location),
                        Err(e) => {
                            println!("{}", e);
                            continue;
                        }
                    },
                    Event::Back => session.back(),
                    Event::Forward => session.forward(),
                    Event::Page(page) => {
                        session.set_page(page);
                        Vec::new()
                    }
                    Event::Debug => {
                        if !session.toggle_debug() && !config.search.debug_allowed {
                            println!("Debug mode is not enabled for this console");
                        }
                        Vec::new()
                    }
                    Event::Features => {
                        load_features(&backend, &mut session).await;
                        Vec::new()
                    }
                    Event::Unknown(input) => {
                        println!("Unknown command {:?}; :help lists commands", input);
                        continue;
                    }
                };
                dispatch(&backend, &tx, requests);
                print!("{}", session.view());
            }
            Some(response) = rx.recv() => {
                // stale responses are dropped inside the session
                if session.apply(response).is_ok() {
                    print!("{}", session.view());
                }
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

/// Run each request as a task on the current-thread runtime; responses come back over `tx`
fn dispatch(
    backend: &Arc<dyn SearchBackend>,
    tx: &mpsc::UnboundedSender<FetchResponse>,
    requests: Vec<FetchRequest>,
) {
    for request in requests {
        let backend = backend.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = request.run(backend.as_ref()).await;
            let _ = tx.send(response);
        });
    }
}

async fn load_features(backend: &Arc<dyn SearchBackend>, session: &mut SearchSession) {
    let mut admin = FeatureAdmin::new(backend.clone());
    match admin.load().await {
        Ok(count) => {
            session.replace_registry(admin.snapshot());
            println!("Loaded {} features", count);
        }
        Err(e) => println!("Could not load features: {}", e),
    }
}

#[derive(Debug, PartialEq)]
enum Event {
    Search(String),
    Draft(String),
    Accept,
    Open(String),
    Back,
    Forward,
    Page(usize),
    Debug,
    Features,
    Help,
    Quit,
    Unknown(String),
}

fn parse_event(line: &str) -> Event {
    let Some(command) = line.strip_prefix(':') else {
        return Event::Search(line.trim().to_string());
    };

    let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
    match (name, arg.trim()) {
        ("draft", text) => Event::Draft(text.to_string()),
        ("accept", _) => Event::Accept,
        ("open", location) if !location.is_empty() => Event::Open(location.to_string()),
        ("back", _) => Event::Back,
        ("forward", _) => Event::Forward,
        ("page", n) => n
            .parse()
            .map(Event::Page)
            .unwrap_or_else(|_| Event::Unknown(line.to_string())),
        ("debug", _) => Event::Debug,
        ("features", _) => Event::Features,
        ("help", _) => Event::Help,
        ("quit", _) | ("q", _) => Event::Quit,
        _ => Event::Unknown(line.to_string()),
    }
}
