use tracing::{info, warn};

use agora::auth::register_with_role;
use agora::db::{Role, UserRepository};
use agora::{AgoraError, Config, Database, WebServer};

#[tokio::main]
async fn main() -> agora::Result<()> {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();
    config.validate()?;

    // Initialize logging
    if let Err(e) = agora::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        agora::logging::init_console_only(&config.logging.level);
    }

    info!("Agora forum server starting");

    // Open the database (creates the file and applies migrations)
    let db = Database::open(&config.database.path).await?;

    // Seed the administrator account
    bootstrap_admin(&db, &config).await?;

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let server = WebServer::from_database(&config.server, &config.session, db);
    server.run().await.map_err(AgoraError::Io)
}

/// Create the configured administrator account if no admin exists yet.
///
/// Admin rights belong to the configured account, never to whoever happened
/// to register first.
async fn bootstrap_admin(db: &Database, config: &Config) -> agora::Result<()> {
    let repo = UserRepository::new(db.pool());

    if repo.admin_exists().await? {
        return Ok(());
    }

    let admin = register_with_role(
        &repo,
        &config.admin.username,
        &config.admin.password,
        Role::Admin,
    )
    .await?;

    info!(name = %admin.name, "Administrator account created");

    if config.admin.has_default_password() {
        warn!(
            "Administrator account uses the default password. \
             Set admin.password in config.toml or the AGORA_ADMIN_PASSWORD \
             environment variable."
        );
    }

    Ok(())
}
