//! C-Square - console client for the club website
//!
//! Browses the public sections (events, team, faculty, gallery) and drives
//! the admin panel against the club backend.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use csquare_core::{Collection, FixedViewport, ScrollState, ToastPhase};
use csquare_net::{ApiClient, ImageUpload};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod error;
mod render;
mod state;
mod viewmodel;

use cli::{AdminAction, Cli, Command, DetailKind};
use config::AppConfig;
use error::{AppError, Result};
use state::AppState;
use viewmodel::{AdminSession, HomePage};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    tracing::info!(base_url = %config.api.base_url, "Starting C-Square");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let state = AppState::new(config)?;
        let command = cli.command.unwrap_or(Command::Home {
            width: None,
            watch: 0,
        });
        match command {
            Command::Home { width, watch } => home(&state, width, watch).await,
            Command::Events { tab } => {
                let viewport = Arc::new(FixedViewport::new(state.config.viewport.width));
                let mut page = mount(&state, viewport);
                page.load(&state.store).await;
                page.set_tab(tab.into(), &state.store);
                print!("{}", render::listing(&page.event_listing(&state.store)));
                Ok(())
            }
            Command::Detail { kind, id } => detail(&state, kind, &id).await,
            Command::Admin { action } => admin(&state, action).await,
        }
    })
}

fn mount(state: &AppState, viewport: Arc<FixedViewport>) -> HomePage {
    HomePage::mount(
        &state.store,
        &state.config,
        viewport,
        Arc::new(ScrollState::default()),
    )
}

fn print_sections(page: &HomePage) {
    print!(
        "{}",
        render::carousel("Events", page.events().render(|e, _| render::event_line(e)))
    );
    print!(
        "{}",
        render::carousel("Team", page.team().render(|m, _| render::member_line(m)))
    );
    print!(
        "{}",
        render::carousel(
            "Faculty",
            page.faculty().render(|m, _| render::faculty_line(m))
        )
    );
    print!(
        "{}",
        render::carousel(
            "Gallery",
            page.gallery().render(|s, _| render::slide_line(s))
        )
    );
}

async fn home(state: &AppState, width: Option<u32>, watch_secs: u64) -> Result<()> {
    let width = width.unwrap_or(state.config.viewport.width);
    let page = mount(state, Arc::new(FixedViewport::new(width)));
    page.load(&state.store).await;
    print_sections(&page);

    // The toast decides on its own whether to appear; wait at most one show delay
    // past the request timeout for it.
    let wait = state.config.toast.timing().show_delay() + state.config.request_timeout();
    let mut phase = page.toast().subscribe();
    let shown = matches!(
        tokio::time::timeout(wait, phase.wait_for(|p| *p == ToastPhase::Visible)).await,
        Ok(Ok(_))
    );
    if shown {
        if let Some(card) = page.toast().card() {
            print!("\n{}", render::toast(&card));
        }
    }

    if watch_secs > 0 {
        let mut events = page.events().subscribe();
        let deadline = tokio::time::sleep(Duration::from_secs(watch_secs));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                changed = events.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    println!();
                    print_sections(&page);
                }
            }
        }
    }
    Ok(())
}

async fn detail(state: &AppState, kind: DetailKind, id: &str) -> Result<()> {
    let collection = Collection::from(kind);

    let viewport = Arc::new(FixedViewport::new(state.config.viewport.width));
    let mut page = mount(state, viewport);
    state.store.fetch(collection, false).await?;
    if !page.open_detail(&state.store, collection, id) {
        return Err(AppError::NotFound(format!("no {collection} record with id '{id}'")));
    }
    if let Some(view) = page.detail() {
        print!("{}", render::detail(&view));
    }
    Ok(())
}

async fn admin(state: &AppState, action: AdminAction) -> Result<()> {
    let mut session = AdminSession::new(state.client.clone());

    match action {
        AdminAction::Login { username, password } => {
            session.credentials.username = username;
            session.credentials.password = password;
            session.login().await;
        }
        AdminAction::Logout => {
            session.logout();
            println!("Logged out");
            return Ok(());
        }
        AdminAction::Status => {
            if session.restore().await {
                println!("Authenticated");
            } else if session.status().is_none() {
                println!("Not logged in");
            }
        }
        AdminAction::List => {
            if session.restore().await {
                print!("{}", render::admin_data(session.data()));
                println!("Toasts ({})", session.toasts().len());
                for toast in session.toasts() {
                    let flag = if toast.is_active { "active" } else { "inactive" };
                    println!("  {}  [{flag}] {}", toast.id, toast.message);
                }
            }
        }
        AdminAction::Delete { collection, id } => {
            if session.restore().await {
                session.delete(collection.into(), &id).await;
            }
        }
        AdminAction::Upload { path } => {
            if !state.client.has_token() {
                println!("Not logged in");
                return Ok(());
            }
            let url = upload(&state.client, &path).await?;
            println!("{url}");
            return Ok(());
        }
    }

    if let Some(status) = session.status() {
        println!("{}", render::status(status));
    }
    Ok(())
}

async fn upload(client: &ApiClient, path: &std::path::Path) -> Result<String> {
    let image = ImageUpload::from_path(path).await?;
    Ok(client.upload_image(image).await?)
}
