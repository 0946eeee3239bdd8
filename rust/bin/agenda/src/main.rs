//! `agenda`: command-line client for Agenda Cultural.
//!
//! Logs in, keeps the session token between runs, and drives the event,
//! registration, promoter and admin endpoints.

mod commands;
mod config;

use std::path::{Path, PathBuf};

use agenda_client::EventQuery;
use agenda_core::{EventAction, EventForm, EventPatch, EventStatus, RegisterForm};
use clap::{Args, Parser, Subcommand};

use commands::app::App;
use commands::output::Output;
use commands::stats::Section;
use config::ClientConfig;

/// Agenda Cultural CLI tool.
#[derive(Parser, Debug)]
#[command(name = "agenda", about = "Agenda Cultural CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.agenda/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value = "table")]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or change client settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Log in and keep the session token.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended; prompts when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and log in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Accept the terms of use.
        #[arg(long = "accept-terms")]
        accept_terms: bool,
    },

    /// End the session and forget the token.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Events.
    #[command(name = "events")]
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },

    /// Saved (bookmarked) events.
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Event registrations.
    #[command(name = "registrations")]
    Registrations {
        #[command(subcommand)]
        action: RegistrationsAction,
    },

    /// Promoter requests.
    Promoters {
        #[command(subcommand)]
        action: PromotersAction,
    },

    /// Admin statistics.
    Stats {
        #[arg(long, value_enum)]
        section: Option<Section>,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Set configuration values.
    Set {
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        storage: Option<String>,
        #[arg(long)]
        retries: Option<u32>,
        #[arg(long = "check-timeout")]
        check_timeout_secs: Option<u64>,
    },
}

/// Listing filters.
#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<EventStatus>,
    #[arg(long)]
    promoter: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<ListArgs> for EventQuery {
    fn from(a: ListArgs) -> Self {
        EventQuery {
            search: a.search,
            promoter_id: a.promoter,
            status: a.status,
            page: a.page,
            limit: a.limit,
        }
    }
}

fn parse_status(s: &str) -> Result<EventStatus, String> {
    EventStatus::parse(s).ok_or_else(|| format!("unknown status: {s}"))
}

#[derive(Args, Debug)]
struct EventFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Start, e.g. 2024-03-15T19:00 (UTC unless an offset is given).
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    /// Image URL; an empty value removes the image on update.
    #[arg(long)]
    image: Option<String>,
    #[arg(long = "requires-registration")]
    requires_registration: Option<bool>,
}

impl EventFields {
    fn into_form(self) -> EventForm {
        EventForm {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            start_date: self.start.unwrap_or_default(),
            end_date: self.end.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            image_url: self.image,
            requires_registration: self.requires_registration.unwrap_or(false),
        }
    }

    fn into_patch(self) -> EventPatch {
        EventPatch {
            title: self.title,
            description: self.description,
            start_date: self.start,
            end_date: self.end,
            location: self.location,
            image_url: self.image,
            requires_registration: self.requires_registration,
        }
    }
}

#[derive(Subcommand, Debug)]
enum EventsAction {
    /// List published events.
    List(ListArgs),
    Get {
        id: String,
    },
    /// Create an event (approved promoters and admins).
    Create(EventFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: EventFields,
    },
    Delete {
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    Cancel {
        id: String,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
        /// At least 5 characters.
        #[arg(long)]
        reason: String,
    },
    /// Withdraw an approval; the event goes back to review.
    Revoke {
        id: String,
    },
    /// Your own events (promoters).
    Mine(ListArgs),
    /// Events awaiting review (admins).
    Pending(ListArgs),
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    List,
    Add { event_id: String },
    Remove { event_id: String },
}

#[derive(Subcommand, Debug)]
enum RegistrationsAction {
    /// Register for an event.
    Add { event_id: String },
    /// Cancel a registration.
    Remove { event_id: String },
    /// Your registrations.
    Mine,
    /// Who registered for an event.
    List { event_id: String },
}

#[derive(Subcommand, Debug)]
enum PromotersAction {
    /// Requests awaiting review (admins).
    Pending,
    /// Ask to become a promoter.
    Request,
    Approve { user_id: String },
    Reject { user_id: String },
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [y/N]: ");
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}

fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{prompt}");
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn config_command(action: ConfigAction, config_path: &Path) -> anyhow::Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config)?);
            println!("# storage: {}", config.storage_path(config_path).display());
        }
        ConfigAction::Set {
            server,
            storage,
            retries,
            check_timeout_secs,
        } => {
            if let Some(s) = server {
                config.server = s;
            }
            if let Some(s) = storage {
                config.storage = s;
            }
            if let Some(r) = retries {
                config.retries = r;
            }
            if let Some(t) = check_timeout_secs {
                config.check_timeout_secs = t;
            }
            config.save(config_path)?;
            println!("Config saved to {}.", config_path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(ClientConfig::default_path);

    // Commands that don't need a session.
    let command = match cli.command {
        Commands::Config { action } => return config_command(action, &config_path),
        Commands::Version => {
            println!("agenda cli v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        command => command,
    };
    let app = App::open(&config_path, cli.output)?;

    match command {
        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => prompt_line("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Senha: ")?,
            };
            commands::account::login(&app, &email, &password).await?;
        }

        Commands::Register {
            name,
            email,
            accept_terms,
        } => {
            let password = rpassword::prompt_password("Senha: ")?;
            let confirm_password = rpassword::prompt_password("Confirmar senha: ")?;
            let form = RegisterForm {
                name,
                email,
                password,
                confirm_password,
                accepted_terms: accept_terms,
            };
            commands::account::register(&app, form).await?;
        }

        Commands::Logout => commands::account::logout(&app).await?,

        Commands::Whoami => commands::account::whoami(&app).await?,

        Commands::Events { action } => match action {
            EventsAction::List(args) => commands::events::list(&app, args.into()).await?,
            EventsAction::Get { id } => commands::events::get(&app, &id).await?,
            EventsAction::Create(fields) => {
                commands::events::create(&app, fields.into_form()).await?
            }
            EventsAction::Update { id, fields } => {
                commands::events::update(&app, &id, fields.into_patch()).await?
            }
            EventsAction::Delete { id, yes } => {
                if !yes && !confirm("Are you sure?")? {
                    println!("Cancelled.");
                    return Ok(());
                }
                commands::events::delete(&app, &id).await?;
            }
            EventsAction::Cancel { id } => {
                commands::events::transition(&app, &id, EventAction::Cancel, None).await?
            }
            EventsAction::Approve { id } => {
                commands::events::transition(&app, &id, EventAction::Approve, None).await?
            }
            EventsAction::Reject { id, reason } => {
                commands::events::transition(&app, &id, EventAction::Reject, Some(&reason))
                    .await?
            }
            EventsAction::Revoke { id } => {
                commands::events::transition(&app, &id, EventAction::Revoke, None).await?
            }
            EventsAction::Mine(args) => commands::events::mine(&app, args.into()).await?,
            EventsAction::Pending(args) => commands::events::pending(&app, args.into()).await?,
        },

        Commands::Saved { action } => match action {
            SavedAction::List => commands::saved::list(&app).await?,
            SavedAction::Add { event_id } => commands::saved::add(&app, &event_id).await?,
            SavedAction::Remove { event_id } => commands::saved::remove(&app, &event_id).await?,
        },

        Commands::Registrations { action } => match action {
            RegistrationsAction::Add { event_id } => {
                commands::registrations::add(&app, &event_id).await?
            }
            RegistrationsAction::Remove { event_id } => {
                commands::registrations::remove(&app, &event_id).await?
            }
            RegistrationsAction::Mine => commands::registrations::mine(&app).await?,
            RegistrationsAction::List { event_id } => {
                commands::registrations::list(&app, &event_id).await?
            }
        },

        Commands::Promoters { action } => match action {
            PromotersAction::Pending => commands::promoters::pending(&app).await?,
            PromotersAction::Request => commands::promoters::request(&app).await?,
            PromotersAction::Approve { user_id } => {
                commands::promoters::approve(&app, &user_id).await?
            }
            PromotersAction::Reject { user_id } => {
                commands::promoters::reject(&app, &user_id).await?
            }
        },

        Commands::Stats { section } => commands::stats::show(&app, section).await?,

        Commands::Config { .. } | Commands::Version => {}
    }

    Ok(())
}
