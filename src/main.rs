//! Elidune Client - Library Management System
//!
//! Command-line front end for the Elidune catalog service.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elidune_client::{
    config::AppConfig,
    models::{book::UpdateBook, user::Role},
    views::{messages, navbar_label, AuthView, BookCard, HomeView},
    AppState,
};

#[derive(Parser)]
#[command(name = "elidune-client", version, about = "Elidune library catalog client")]
struct Cli {
    /// Backing service base URL, e.g. http://localhost:5000/api
    #[arg(long, global = true, env = "API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the credential
    Login { username: String, password: String },
    /// Create an account
    Register {
        username: String,
        password: String,
        #[arg(long, default_value = "Member")]
        role: Role,
    },
    /// Forget the stored credential
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List the catalog, optionally filtered by title or author
    Books {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Add a book (admin)
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        isbn: String,
    },
    /// Edit a book (admin)
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
    },
    /// Delete a book (admin)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Borrow a book (member)
    Borrow { id: String },
    /// Return a borrowed book (member)
    Return { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    init_tracing(&config);

    tracing::debug!("Using service at {}", config.api.base_url);
    let state = AppState::new(config)?;
    let services = &state.services;
    services.session.restore_session();

    let auth = AuthView::new(services);
    let home = HomeView::new(services);

    let succeeded = match cli.command {
        Command::Login { username, password } => match auth.login(&username, &password).await {
            Some(session) => {
                if let Some(label) = navbar_label(Some(&session)) {
                    println!("{}", label);
                }
                true
            }
            None => false,
        },
        Command::Register { username, password, role } => {
            auth.register(&username, &password, role).await
        }
        Command::Logout => {
            auth.logout();
            true
        }
        Command::Whoami => match navbar_label(services.session.current().as_ref()) {
            Some(label) => {
                println!("{}", label);
                true
            }
            None => {
                println!("Not logged in");
                false
            }
        },
        Command::Books { search } => {
            let loaded = match search.as_deref() {
                Some(query) => home.search(query).await,
                None => home.refresh().await,
            };
            let cards = home.cards();
            if cards.is_empty() && (loaded || services.session.current().is_none()) {
                println!("{}", home.empty_message());
            }
            for card in &cards {
                print_card(card);
            }
            loaded
        }
        Command::Add { title, author, isbn } => {
            home.refresh().await
                && match home.add_book(&title, &author, &isbn).await {
                    Some(book) => {
                        print_card(&BookCard::new(book, services.session.current().as_ref()));
                        true
                    }
                    None => false,
                }
        }
        Command::Update { id, title, author, isbn } => {
            home.refresh().await
                && home.update_book(&id, UpdateBook { title, author, isbn }).await.is_some()
        }
        Command::Delete { id, yes } => {
            if home.refresh().await {
                let confirmed = yes || confirm(messages::DELETE_CONFIRM)?;
                home.delete_book(&id, confirmed).await
            } else {
                false
            }
        }
        Command::Borrow { id } => home.refresh().await && home.borrow(&id).await.is_some(),
        Command::Return { id } => home.refresh().await && home.return_book(&id).await.is_some(),
    };

    if let Some(note) = services.notifications.current() {
        eprintln!("[{}] {}", note.severity, note.message);
    }

    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_client={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn print_card(card: &BookCard) {
    let book = &card.book;
    println!(
        "{:<12} {} by {} (ISBN {}) [{}]",
        book.id, book.title, book.author, book.isbn, card.status
    );
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
