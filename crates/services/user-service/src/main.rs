//! User Service - command-line front end for user management.

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{AppError, AppResult};
use domain::{NewUser, UserChanges};
use user_service_lib::config::UserServiceConfig;
use user_service_lib::infra::Database;
use user_service_lib::{MigrateAction, Services};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User management and authentication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Check database connectivity
    Check,
    /// Create a user
    Create {
        username: String,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        religion: String,
        #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show a user's profile
    Show {
        /// Username to look up
        #[arg(conflicts_with = "id", required_unless_present = "id")]
        username: Option<String>,
        /// Look up by id instead
        #[arg(long)]
        id: Option<i32>,
    },
    /// Update selected fields of a user
    Update {
        username: String,
        #[arg(long)]
        new_username: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        religion: Option<String>,
        #[arg(long, env = "USER_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Permanently delete a user
    Delete { username: String },
    /// List all users
    List,
    /// Check a username and password
    Login {
        username: String,
        #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateCommands> for MigrateAction {
    fn from(action: MigrateCommands) -> Self {
        match action {
            MigrateCommands::Up => MigrateAction::Up,
            MigrateCommands::Down => MigrateAction::Down,
            MigrateCommands::Status => MigrateAction::Status,
            MigrateCommands::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match UserServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("Error [{}]: {}", e.code(), e.user_message());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &UserServiceConfig) -> AppResult<()> {
    let db = Database::new(&config.database);

    match command {
        Commands::Migrate { action } => {
            for (name, applied) in user_service_lib::run_migrations(&db, action.into()).await? {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        Commands::Check => {
            db.ping().await?;
            print_json(&json!({ "status": "ok" }))?;
        }
        Commands::Create {
            username,
            display_name,
            email,
            religion,
            password,
        } => {
            let services = Services::new(db);
            let new_user = NewUser::new(username, display_name, email, religion, password);
            let id = services.users.create_user(new_user).await?;
            print_json(&json!({ "id": id }))?;
        }
        Commands::Show { username, id } => {
            let services = Services::new(db);
            let profile = match (username, id) {
                (Some(username), _) => services.users.get_user(&username).await?,
                (None, Some(id)) => services.users.get_user_by_id(id).await?,
                (None, None) => return Err(AppError::invalid_argument("username or --id is required")),
            };
            print_json(&profile)?;
        }
        Commands::Update {
            username,
            new_username,
            display_name,
            email,
            religion,
            password,
        } => {
            let services = Services::new(db);
            let changes = UserChanges {
                username: new_username,
                display_name,
                email,
                religion,
                password,
            };
            services.users.update_user(&username, changes).await?;
            print_json(&json!({ "updated": username }))?;
        }
        Commands::Delete { username } => {
            let services = Services::new(db);
            services.users.delete_user(&username).await?;
            print_json(&json!({ "deleted": username }))?;
        }
        Commands::List => {
            let services = Services::new(db);
            print_json(&services.users.list_users().await?)?;
        }
        Commands::Login { username, password } => {
            let services = Services::new(db);
            print_json(&services.auth.login(&username, &password).await?)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to serialize output: {}", e)))?;
    println!("{}", out);
    Ok(())
}
