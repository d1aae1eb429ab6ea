/// Soundmark Server - personal album-library tracker API
use clap::{Parser, Subcommand};
use soundmark_core::types::User;
use soundmark_lastfm::LastfmClient;
use soundmark_server::{config::ServerConfig, create_app, services::AuthService, state::AppState};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soundmark-server")]
#[command(about = "Soundmark album-library tracker server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundmark_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            serve().await?;
        }
        Commands::AddUser { email, password } => {
            add_user(&email, &password).await?;
        }
        Commands::ListUsers => {
            list_users().await?;
        }
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;
    config.validate()?;

    tracing::info!("Starting Soundmark Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = soundmark_storage::create_pool(&config.storage.database_url).await?;
    soundmark_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    ));
    tracing::info!("Auth service initialized");

    // Initialize Last.fm client if a key is configured
    let lastfm = if config.lastfm.api_key.is_empty() {
        tracing::warn!("No Last.fm API key configured; lastfm routes disabled");
        None
    } else {
        let client = match &config.lastfm.base_url {
            Some(base_url) => {
                LastfmClient::with_base_url(config.lastfm.api_key.as_str(), base_url.as_str())?
            }
            None => LastfmClient::new(config.lastfm.api_key.as_str())?,
        };
        Some(Arc::new(client))
    };

    // Build application state and router
    let app_state = AppState::new(pool, auth_service, lastfm, config.limits);
    let app = create_app(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(email: &str, password: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = soundmark_storage::create_pool(&config.storage.database_url).await?;
    soundmark_storage::run_migrations(&pool).await?;

    if soundmark_storage::users::get_by_email(&pool, email)
        .await?
        .is_some()
    {
        anyhow::bail!("A user with email {email} already exists");
    }

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    );

    let user = User::new(email);
    soundmark_storage::users::create(&pool, &user).await?;

    let password_hash = auth_service.hash_password(password)?;
    soundmark_storage::users::set_password_hash(&pool, &user.id, &password_hash).await?;

    println!("Created user {} ({})", user.email, user.id);

    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = soundmark_storage::create_pool(&config.storage.database_url).await?;
    soundmark_storage::run_migrations(&pool).await?;

    let users = soundmark_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {}", user.id, user.email);
    }

    Ok(())
}
