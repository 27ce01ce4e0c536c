//! Web server for Agora.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::compression::CompressionLayer;

use crate::auth::SessionManager;
use crate::config::{ServerConfig, SessionConfig};
use crate::Database;

use super::handlers::{AppState, SharedDatabase};
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, session_config: &SessionConfig, db: SharedDatabase) -> Self {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .expect("Invalid web server address");

        let sessions = SessionManager::with_config(
            session_config.duration_secs,
            session_config.idle_timeout_secs,
        );

        Self {
            addr,
            app_state: Arc::new(AppState::new(db, sessions)),
            cors_origins: config.cors_origins.clone(),
        }
    }

    /// Create a new web server from a raw Database.
    pub fn from_database(
        config: &ServerConfig,
        session_config: &SessionConfig,
        db: Database,
    ) -> Self {
        Self::new(config, session_config, Arc::new(db))
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the session sweep background task.
    ///
    /// Sessions are held in memory, so abandoned logins linger until the
    /// sweep drops everything expired or idled out.
    fn start_session_sweep_task(sessions: Arc<Mutex<SessionManager>>) {
        tokio::spawn(async move {
            // Sweep interval: 10 minutes
            const SWEEP_INTERVAL_SECS: u64 = 600;

            let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let removed = {
                    let mut sessions = sessions.lock().await;
                    sessions.cleanup()
                };

                if removed > 0 {
                    tracing::info!(removed_count = removed, "Cleaned up expired sessions");
                } else {
                    tracing::debug!("No expired sessions to clean up");
                }
            }
        });
    }

    /// Run the web server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        // Clone the session handle before moving app_state to the router
        let sessions = self.app_state.sessions.clone();

        let router = create_router(self.app_state, &self.cors_origins)
            .merge(create_health_router())
            .layer(CompressionLayer::new());

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start the session sweep after a successful bind
        Self::start_session_sweep_task(sessions);
        tracing::info!("Session sweep task started (runs every 10 minutes)");

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        // Clone the session handle before moving app_state to the router
        let sessions = self.app_state.sessions.clone();

        let router = create_router(self.app_state, &self.cors_origins)
            .merge(create_health_router())
            .layer(CompressionLayer::new());

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start the session sweep after a successful bind
        Self::start_session_sweep_task(sessions);
        tracing::info!("Session sweep task started (runs every 10 minutes)");

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> (ServerConfig, SessionConfig) {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            cors_origins: vec![],
        };
        (server, SessionConfig::default())
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let (server_config, session_config) = create_test_config();
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::from_database(&server_config, &session_config, db);
        assert_eq!(server.addr.ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_binds() {
        let (server_config, session_config) = create_test_config();
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::from_database(&server_config, &session_config, db);
        let addr = server.run_with_addr().await.unwrap();

        // Port 0 resolves to a real ephemeral port on bind
        assert_ne!(addr.port(), 0);
    }
}
