use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use storefront::catalog::SortKey;
use storefront::config::Config;
use storefront::repl::{parse_line, ReplCommand, HELP};
use storefront::session::{EnvSession, SessionProvider, SessionStatus, SharedSession};
use storefront::ui::browse::{BrowseIntent, BrowseReducer, BrowseState, StateError};
use storefront::ui::mvi::Reducer;
use storefront::ui::render::{Renderer, Screen, TextRenderer};
use storefront::{CatalogEngine, Frame};

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Browse the storefront product catalog")]
struct Cli {
    /// Path to config file (default: <config dir>/storefront/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the catalog API base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the fetch deadline
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u32>,

    /// Re-filter and re-sort every page on the client
    #[arg(long)]
    fallback: bool,

    /// Page to show
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Sort order: newest, oldest, price-asc, price-desc
    #[arg(long, default_value = "newest")]
    sort: SortKey,

    /// Lower price bound
    #[arg(long, value_name = "PRICE")]
    min_price: Option<f64>,

    /// Upper price bound
    #[arg(long, value_name = "PRICE")]
    max_price: Option<f64>,

    /// Session status to display (default: read STOREFRONT_SESSION)
    #[arg(long, value_name = "STATUS")]
    session: Option<SessionStatus>,

    /// Read commands from stdin instead of printing one page
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    storefront::logging::init_tracing("warn");

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    if let Some(base_url) = &cli.base_url {
        config.catalog.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.catalog.request_timeout_seconds = timeout;
    }
    if cli.fallback {
        config.catalog.client_fallback = true;
    }
    config.validate()?;

    let session = SharedSession::new(cli.session.unwrap_or_else(|| EnvSession.status()));

    let state = initial_state(&cli)?;
    let engine = CatalogEngine::from_config(&config.catalog)?.with_state(state);

    if cli.interactive {
        run_interactive(engine, session).await
    } else {
        run_once(engine, session).await
    }
}

fn initial_state(cli: &Cli) -> Result<BrowseState, StateError> {
    let mut intents = vec![BrowseIntent::SetSort(cli.sort)];
    if cli.min_price.is_some() || cli.max_price.is_some() {
        intents.push(BrowseIntent::SetFilters {
            min_price: cli.min_price,
            max_price: cli.max_price,
        });
    }
    intents.push(BrowseIntent::SetPage(cli.page));

    intents
        .into_iter()
        .try_fold(BrowseState::default(), |state, intent| {
            BrowseReducer::reduce(&state, intent)
        })
}

async fn run_once(mut engine: CatalogEngine, session: SharedSession) -> anyhow::Result<()> {
    engine.start();
    engine
        .settle_until_commit()
        .await
        .context("catalog engine stopped before a response arrived")?;

    let frame = engine.frame();
    let mut renderer = TextRenderer::new(std::io::stdout());
    render_frame(&mut renderer, &frame, &session)?;

    if let Some(kind) = frame.view.error_kind {
        anyhow::bail!("catalog request failed: {}", kind.user_message());
    }
    Ok(())
}

async fn run_interactive(engine: CatalogEngine, session: SharedSession) -> anyhow::Result<()> {
    let (handle, engine_task) = engine.spawn();

    let mut frames = handle.frames();
    let render_session = session.clone();
    let render_task = tokio::spawn(async move {
        let mut renderer = TextRenderer::new(std::io::stdout());
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            if frame.view.is_loading {
                continue;
            }
            if let Err(e) = render_frame(&mut renderer, &frame, &render_session) {
                tracing::warn!(error = %e, "failed to render");
                break;
            }
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(ReplCommand::Help)) => println!("{}", HELP),
            Ok(Some(ReplCommand::Session(status))) => {
                session.set(status);
                let frame = handle.frames().borrow().clone();
                if !frame.view.is_loading {
                    render_frame(&mut TextRenderer::new(std::io::stdout()), &frame, &session)?;
                }
            }
            Ok(Some(ReplCommand::Intent(intent))) => {
                if let Err(e) = handle.dispatch(intent).await? {
                    eprintln!("error: {}", e);
                }
            }
            Err(message) => eprintln!("error: {}", message),
        }
    }

    handle.shutdown().await;
    engine_task.await?;
    render_task.abort();
    Ok(())
}

fn render_frame(
    renderer: &mut impl Renderer,
    frame: &Frame,
    session: &impl SessionProvider,
) -> std::io::Result<()> {
    renderer.render(&Screen {
        view: &frame.view,
        state: &frame.state,
        session: session.status(),
    })
}
