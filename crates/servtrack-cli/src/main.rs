use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use servtrack_application::{ApiGateway, ServiceStore, SessionStore};
use servtrack_core::credential::CredentialStore;
use servtrack_core::service::{Priority, ServicePatch, ServiceStatus};
use servtrack_infrastructure::{
    ClientConfig, FileCredentialStore, ReqwestTransport, ServtrackPaths,
};

#[derive(Parser)]
#[command(name = "servtrack")]
#[command(about = "servtrack CLI - service ticket tracking client", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session token
    Login { email: String, password: String },
    /// Create an account and sign in
    Register {
        name: String,
        email: String,
        password: String,
        /// One of: admin, manager, technician, user
        #[arg(default_value = "user")]
        role: String,
    },
    /// Sign out and delete the persisted token
    Logout,
    /// Show the currently signed-in user
    Whoami,
    /// Work with service tickets
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Show aggregate counts by status
    Stats,
}

#[derive(Subcommand)]
enum ServiceAction {
    /// List all services
    List,
    /// Show one service
    Show { id: String },
    /// Create a service
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// One of: low, medium, high, critical
        #[arg(long)]
        priority: Option<String>,
        /// RFC 3339 timestamp, e.g. 2026-09-01T12:00:00Z
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Update fields on a service
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// One of: pending, in-progress, completed, cancelled
        #[arg(long)]
        status: Option<String>,
        /// One of: low, medium, high, critical
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete a service
    Delete { id: String },
    /// Replace the assignee set with the given user ids
    Assign {
        id: String,
        #[arg(required = true)]
        users: Vec<String>,
    },
}

struct App {
    session: SessionStore,
    services: ServiceStore,
}

impl App {
    fn build(config_path: Option<PathBuf>) -> Result<Self> {
        let paths = ServtrackPaths::new(None)?;
        let config_file = config_path.unwrap_or_else(|| paths.config_file());
        let config = ClientConfig::load(&config_file)?;

        let credentials_path = config
            .credentials_path
            .clone()
            .unwrap_or_else(|| paths.credentials_file());
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(credentials_path));

        let transport = ReqwestTransport::with_timeout(
            config.base_url.as_str(),
            Duration::from_secs(config.timeout_secs),
        )?;
        let gateway = Arc::new(ApiGateway::new(Arc::new(transport), credentials.clone()));

        Ok(Self {
            session: SessionStore::new(gateway.clone(), credentials),
            services: ServiceStore::new(gateway),
        })
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let app = App::build(cli.config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let user = app.session.login(&email, &password).await?;
            print_json(&user)?;
        }
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let user = app.session.register(&name, &email, &password, &role).await?;
            print_json(&user)?;
        }
        Commands::Logout => {
            app.session.logout().await?;
            println!("signed out");
        }
        Commands::Whoami => match app.session.restore_session().await? {
            Some(user) => print_json(&user)?,
            None => println!("not signed in"),
        },
        Commands::Services { action } => run_service_action(&app, action).await?,
        Commands::Stats => {
            let stats = app.services.refresh_stats().await?;
            print_json(&stats)?;
        }
    }

    Ok(())
}

async fn run_service_action(app: &App, action: ServiceAction) -> Result<()> {
    match action {
        ServiceAction::List => {
            let services = app.services.fetch_all().await?;
            print_json(&services)?;
        }
        ServiceAction::Show { id } => {
            let service = app.services.fetch_one(&id).await?;
            print_json(&service)?;
        }
        ServiceAction::Create {
            title,
            description,
            category,
            priority,
            deadline,
        } => {
            let mut patch = ServicePatch::new().with_title(title);
            if let Some(description) = description {
                patch = patch.with_description(description);
            }
            if let Some(category) = category {
                patch = patch.with_category(category);
            }
            if let Some(priority) = priority {
                patch = patch.with_priority(priority.parse::<Priority>()?);
            }
            if let Some(deadline) = deadline {
                let deadline: DateTime<Utc> = deadline
                    .parse()
                    .with_context(|| format!("invalid deadline '{deadline}'"))?;
                patch = patch.with_deadline(deadline);
            }
            let service = app.services.create(&patch).await?;
            print_json(&service)?;
        }
        ServiceAction::Update {
            id,
            title,
            description,
            status,
            priority,
        } => {
            let mut patch = ServicePatch::new();
            if let Some(title) = title {
                patch = patch.with_title(title);
            }
            if let Some(description) = description {
                patch = patch.with_description(description);
            }
            if let Some(status) = status {
                patch = patch.with_status(status.parse::<ServiceStatus>()?);
            }
            if let Some(priority) = priority {
                patch = patch.with_priority(priority.parse::<Priority>()?);
            }
            let service = app.services.update(&id, &patch).await?;
            print_json(&service)?;
        }
        ServiceAction::Delete { id } => {
            app.services.delete(&id).await?;
            println!("deleted {id}");
        }
        ServiceAction::Assign { id, users } => {
            let patch = ServicePatch::new().with_assignees(users);
            let service = app.services.update(&id, &patch).await?;
            print_json(&service)?;
        }
    }
    Ok(())
}
