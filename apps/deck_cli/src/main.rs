use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use client_core::{
    api::DEFAULT_OUTLINE_PAGES,
    config::{load_settings, ClientSettings},
    presenter::{PresentationCursor, PresenterKey},
    render::render_slide,
    time::format_time_ago,
    ClientError, DeckApiClient, ProjectSession, ReorderOutcome, SlideListState,
};
use shared::domain::{ProjectId, SlideId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "deck", about = "Browse, reorder and present generated slide decks")]
struct Cli {
    /// Overrides `backend_url` from deck.toml / DECK_BACKEND_URL.
    #[arg(long, global = true)]
    backend_url: Option<String>,
    /// Overrides `token` from deck.toml / DECK_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,
    /// Print raw JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Projects,
    Rename {
        project: ProjectId,
        title: String,
    },
    DeleteProject {
        project: ProjectId,
    },
    /// Draft an outline from a description, then build every slide from it.
    Generate {
        project: ProjectId,
        /// Free-text description of the deck, at least 20 characters.
        prompt: Option<String>,
        #[arg(long, default_value_t = DEFAULT_OUTLINE_PAGES)]
        pages: u32,
        /// Slide title to use instead of a drafted outline; repeatable.
        #[arg(long = "title")]
        titles: Vec<String>,
        /// Print the drafted outline and stop.
        #[arg(long)]
        outline_only: bool,
    },
    Show {
        project: ProjectId,
    },
    /// Move the slide at position FROM to position TO (1-based).
    Reorder {
        project: ProjectId,
        from: usize,
        to: usize,
    },
    DeleteSlide {
        project: ProjectId,
        slide: String,
    },
    SetImage {
        project: ProjectId,
        slide: String,
        url: String,
    },
    SuggestTitles {
        project: ProjectId,
    },
    AddSlide {
        project: ProjectId,
        title: String,
    },
    Favorite {
        project: ProjectId,
    },
    Present {
        project: ProjectId,
        #[arg(long, default_value_t = 1)]
        start: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let result = run(Cli::parse()).await;
    if let Err(err) = &result {
        if err
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::requires_reauth)
        {
            eprintln!("The backend rejected the token; sign in again and pass a fresh --token.");
        }
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let settings = settings_for(&cli);
    let api = Arc::new(DeckApiClient::from_settings(&settings).context("invalid client settings")?);
    if settings.token.is_none() {
        tracing::warn!("no token configured; the backend will likely reject requests");
    }

    match cli.command {
        Command::Projects => list_projects(&api, cli.json).await,
        Command::Rename { project, title } => {
            let updated = api.rename_project(project, &title).await?;
            println!("Renamed to {}.", updated.title);
            Ok(())
        }
        Command::DeleteProject { project } => {
            api.delete_project(project).await?;
            println!("Project {project} deleted.");
            Ok(())
        }
        Command::Generate {
            project,
            prompt,
            pages,
            titles,
            outline_only,
        } => generate(api, project, prompt, pages, titles, outline_only).await,
        Command::Show { project } => {
            let session = ProjectSession::open(api, project).await?;
            let state = session.store().snapshot().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(state.slides())?);
            } else {
                print_outline(session.title(), &state);
            }
            Ok(())
        }
        Command::Reorder { project, from, to } => {
            if from == 0 || to == 0 {
                bail!("slide positions start at 1");
            }
            let session = ProjectSession::open(api, project).await?;
            match session.reorder(from - 1, Some(to - 1)).await? {
                ReorderOutcome::NoOp => println!("Slide already at position {to}."),
                ReorderOutcome::Saved { .. } => println!("Saving order... done."),
                ReorderOutcome::Reverted { message } | ReorderOutcome::Superseded { message } => {
                    bail!("failed to reorder slides, order left unchanged: {message}")
                }
            }
            print_outline(session.title(), &session.store().snapshot().await);
            Ok(())
        }
        Command::DeleteSlide { project, slide } => {
            let session = ProjectSession::open(api, project).await?;
            session.delete_slide(&SlideId::new(slide)).await?;
            print_outline(session.title(), &session.store().snapshot().await);
            Ok(())
        }
        Command::SetImage {
            project,
            slide,
            url,
        } => {
            let session = ProjectSession::open(api, project).await?;
            session.change_image(&SlideId::new(slide), &url).await?;
            println!("Image updated.");
            Ok(())
        }
        Command::SuggestTitles { project } => {
            for (index, title) in api.suggest_slide_titles(project).await?.iter().enumerate() {
                println!("{}. {title}", index + 1);
            }
            Ok(())
        }
        Command::AddSlide { project, title } => {
            if title.trim().is_empty() {
                bail!("slide title must not be empty");
            }
            let session = ProjectSession::open(api, project).await?;
            session.add_slide(&title).await?;
            print_outline(session.title(), &session.store().snapshot().await);
            Ok(())
        }
        Command::Favorite { project } => {
            let current = api
                .list_projects()
                .await?
                .into_iter()
                .find(|p| p.id == project)
                .with_context(|| format!("project {project} not found"))?;
            let updated = api.toggle_favorite(project, current.is_favorite).await?;
            println!(
                "{} is {}a favorite.",
                updated.title,
                if updated.is_favorite { "" } else { "no longer " }
            );
            Ok(())
        }
        Command::Present { project, start } => {
            let mut session = ProjectSession::open(api, project).await?;
            present(&mut session, start).await
        }
    }
}

async fn generate(
    api: Arc<DeckApiClient>,
    project: ProjectId,
    prompt: Option<String>,
    pages: u32,
    titles: Vec<String>,
    outline_only: bool,
) -> Result<()> {
    let titles = if titles.is_empty() {
        let Some(prompt) = prompt else {
            bail!("pass a description or at least one --title");
        };
        let outline = api.generate_outline(project, &prompt, pages).await?;
        println!("{}", outline.title);
        for (index, title) in outline.slide_titles.iter().enumerate() {
            println!("{:>3}. {title}", index + 1);
        }
        outline.slide_titles
    } else {
        titles
    };
    if outline_only {
        return Ok(());
    }

    println!("Generating {} slides...", titles.len());
    let mut session = ProjectSession::open(api, project).await?;
    session.generate(&titles).await?;
    print_outline(session.title(), &session.store().snapshot().await);
    Ok(())
}

fn settings_for(cli: &Cli) -> ClientSettings {
    let mut settings = load_settings();
    if let Some(url) = &cli.backend_url {
        settings.backend_url = url.clone();
    }
    if let Some(token) = &cli.token {
        settings.token = Some(token.clone());
    }
    settings
}

async fn list_projects(api: &DeckApiClient, json: bool) -> Result<()> {
    let projects = api.list_projects().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    let now = Utc::now();
    for project in projects {
        println!(
            "{} {}  {}  (updated {})",
            if project.is_favorite { "*" } else { " " },
            project.id,
            project.title,
            format_time_ago(project.updated_at, now)
        );
    }
    Ok(())
}

fn slide_title(state: &SlideListState, index: usize) -> String {
    state.slides()[index]
        .content
        .display_title()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Slide {}", index + 1))
}

fn print_outline(title: &str, state: &SlideListState) {
    println!("{title}");
    for (index, slide) in state.slides().iter().enumerate() {
        println!(
            "{:>3}. [{}] {} (id {})",
            index + 1,
            slide.layout_type(),
            slide_title(state, index),
            slide.id
        );
        if let Some(message) = slide.content.key_message() {
            println!("       {message}");
        }
    }
}

async fn present(session: &mut ProjectSession, start: usize) -> Result<()> {
    let mut state = session.store().snapshot().await;
    let mut cursor = PresentationCursor::new(state.len());
    if cursor.is_empty() {
        println!("{} has no slides.", session.title());
        return Ok(());
    }
    cursor.go_to(start.saturating_sub(1));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if cursor.show_grid() {
            for index in 0..state.len() {
                let current = if index == cursor.index() { ">" } else { " " };
                println!("{current}{:>3}. {}", index + 1, slide_title(&state, index));
            }
        } else {
            print!("{}", render_slide(&state.slides()[cursor.index()]));
        }
        println!(
            "-- {} --  [enter/n] next  [p] previous  [g] grid  [number] jump  [r] reload  [q] quit",
            cursor.progress_label()
        );

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == "r" {
            session.refresh().await?;
            state = session.store().snapshot().await;
            cursor.resize(state.len());
            if cursor.is_empty() {
                println!("{} has no slides left.", session.title());
                break;
            }
            continue;
        }
        if let Some(key) = PresenterKey::from_input(input) {
            if key == PresenterKey::Quit {
                break;
            }
            cursor.handle_key(key);
        } else if let Ok(position) = input.parse::<usize>() {
            if position == 0 || position > cursor.len() {
                println!("No slide at position {position}.");
            } else {
                cursor.go_to(position - 1);
            }
        } else {
            println!("Unknown command '{input}'.");
        }
    }
    Ok(())
}
