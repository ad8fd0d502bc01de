use std::io;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::prelude::*;
use uuid::Uuid;

mod app;
mod cli;
mod config;
mod error;
mod lifecycle;
mod media;
mod models;
mod search;
mod services;
mod store;
mod tui;

#[cfg(test)]
mod test_utils;

use app::App;
use config::Config;
use error::{AppError, Result};
use lifecycle::ArticleManager;
use search::filter_articles;
use services::{BackendClient, ObjectStorage};
use store::{ArticleStore, RestStore};
use tui::{draw, handle_key_event, PageMeta};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    // Headless modes print and exit
    match args.get(1).map(String::as_str) {
        Some("--list") => return print_listing(&config, "").await,
        Some("--search") => {
            let query = args.get(2).map(String::as_str).unwrap_or("");
            return print_listing(&config, query).await;
        }
        Some("--show") => {
            let id = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Usage: newsroom --show <article-id>"))?;
            return print_article(&config, id).await;
        }
        _ => {}
    }

    // Initialize app
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle(app.page_meta.window_title())
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B, S, O>(terminal: &mut Terminal<B>, app: &mut App<S, O>) -> Result<()>
where
    B: Backend + io::Write,
    S: ArticleStore + Send + Sync + 'static,
    O: ObjectStorage + Send + Sync + 'static,
{
    let mut shown_meta = PageMeta::site();

    loop {
        // Apply finished remote work (non-blocking)
        app.poll_tasks();

        terminal.draw(|frame| draw(frame, app))?;

        // Publish page metadata when the view changes
        if app.page_meta != shown_meta {
            let meta = &app.page_meta;
            tracing::debug!(
                title = %meta.title,
                description = %meta.description,
                image = ?meta.image,
                category = ?meta.category,
                "Page metadata changed"
            );
            execute!(terminal.backend_mut(), SetTitle(meta.window_title()))?;
            shown_meta = app.page_meta.clone();
        }

        // Poll for events with timeout to keep the UI responsive
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.screen, app.mode, app.show_help)
                    {
                        let should_quit = app.handle_action(action)?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

fn manager(config: &Config) -> Result<ArticleManager<RestStore>> {
    let backend = BackendClient::new(config)?;
    Ok(ArticleManager::new(
        RestStore::new(backend),
        config.placeholder_image.clone(),
    ))
}

async fn print_listing(config: &Config, query: &str) -> Result<()> {
    let articles = manager(config)?.list_published().await?;
    let matches = filter_articles(&articles, query);

    for article in &matches {
        println!("{}", cli::format_card(article));
    }
    println!("{} of {} stories", matches.len(), articles.len());
    Ok(())
}

async fn print_article(config: &Config, id: &str) -> Result<()> {
    let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound)?;
    let manager = manager(config)?;
    let article = manager.get_published(id).await?;
    print!("{}", cli::format_article(&article, manager.placeholder_image()));
    Ok(())
}
