//! Terminal front end for notes-api.
//!
//! Configuration via environment:
//! - NOTES_API_URL: base URL of the API (default: http://localhost:3000/api)
//! - RUST_LOG: log filter (default: error)

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use notes_client::{
    ApiClient, Route, Toast, ToastKind,
    api::DEFAULT_BASE_URL,
    pages::{CreatePage, HomePage, NoteDetailPage, Outcome},
    view::{self, NoteCard},
};

#[derive(Parser)]
#[command(name = "notes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the notes API
    #[arg(long, env = "NOTES_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all notes
    List,

    /// Create a new note
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },

    /// Show a single note
    Show { id: i64 },

    /// Change the title and/or content of a note
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Open a page by path: `/`, `/create` or `/note/<id>`
    Open { path: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::exit(1);
        }
    }
}

/// Returns `false` when the action ended with an error toast.
async fn run(cli: Cli) -> Result<bool> {
    let api = ApiClient::new(&cli.url)?;
    tracing::debug!("Using notes API at {}", api.base_url());

    let ok = match cli.command {
        Commands::List => open(&api, Route::Home).await,
        Commands::Create { title, content } => {
            let mut page = CreatePage::new(title, content);
            let outcome = page.submit(&api).await;
            follow(&api, outcome).await
        }
        Commands::Show { id } => open(&api, Route::Note(id)).await,
        Commands::Edit { id, title, content } => {
            let mut page = NoteDetailPage::new(id);
            if let Some(toast) = page.load(&api).await {
                print_toast(&toast);
                return Ok(false);
            }
            if let Some(title) = title {
                page.title = title;
            }
            if let Some(content) = content {
                page.content = content;
            }
            let outcome = page.save(&api).await;
            follow(&api, outcome).await
        }
        Commands::Delete { id, yes } => {
            let confirmed = yes || confirm("Are you sure you want to delete this note?")?;
            let mut page = NoteDetailPage::new(id);
            let outcome = page.delete(&api, confirmed).await;
            follow(&api, outcome).await
        }
        Commands::Open { path } => open(&api, path.parse()?).await,
    };

    Ok(ok)
}

/// Prints the outcome's toast and renders the page it navigates to.
async fn follow(api: &ApiClient, outcome: Outcome) -> bool {
    let ok = outcome.toast.as_ref().is_none_or(|toast| !toast.is_error());
    if let Some(toast) = &outcome.toast {
        print_toast(toast);
    }
    match outcome.navigate {
        Some(route) => open(api, route).await && ok,
        None => ok,
    }
}

async fn open(api: &ApiClient, route: Route) -> bool {
    match route {
        Route::Home => {
            let mut page = HomePage::new();
            let toast = page.load(api).await;
            render_home(&page);
            toast.is_none_or(|toast| {
                print_toast(&toast);
                false
            })
        }
        Route::Create => {
            println!("{}", "Create New Note".bold());
            println!("  notes create --title <TITLE> --content <CONTENT>");
            true
        }
        Route::Note(id) => {
            let mut page = NoteDetailPage::new(id);
            match page.load(api).await {
                Some(toast) => {
                    print_toast(&toast);
                    false
                }
                None => {
                    if let Some(note) = &page.note {
                        print_card(&NoteCard::new(note));
                    }
                    true
                }
            }
        }
    }
}

fn render_home(page: &HomePage) {
    if page.is_rate_limited {
        println!("{}", view::RATE_LIMITED_TITLE.yellow().bold());
        println!("{}", view::RATE_LIMITED_BODY);
        println!("{}", view::RATE_LIMITED_HINT.dimmed());
        return;
    }

    let notes = page.visible_notes();
    if notes.is_empty() {
        println!("{}", view::empty_list_hint().dimmed());
        return;
    }

    for note in notes {
        print_card(&NoteCard::new(note));
    }
}

fn print_card(card: &NoteCard) {
    println!("{}", card.header.green().bold());
    println!("{}", card.body);
    println!("{}", card.footer.dimmed());
    println!();
}

fn print_toast(toast: &Toast) {
    match toast.kind {
        ToastKind::Success => println!("{} {}", "✔".green().bold(), toast.message.green()),
        ToastKind::Error => eprintln!("{} {}", "✖".red().bold(), toast.message.red()),
    }
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
