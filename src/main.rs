// src/main.rs

use coursedeck::config::Config;
use coursedeck::models::user::User;
use coursedeck::routes;
use coursedeck::state::AppState;
use coursedeck::store::{self, Store};
use coursedeck::utils::hash::hash_password;
use chrono::Utc;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Bootstrap the record store: data dir plus one JSON file per collection
    let store = Store::new(&config.data_dir);
    store
        .ensure_files()
        .await
        .expect("Failed to initialize data files");
    tracing::info!("Record store ready at {}", config.data_dir);

    // Seed Admin/Teacher Account
    if let Err(e) = seed_admin_user(&store, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    // Create AppState
    let state = AppState {
        store,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

async fn seed_admin_user(store: &Store, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let email = email.to_lowercase();
        let mut users: Vec<User> = store.load(store::USERS).await?;

        if !users.iter().any(|u| u.email == email) {
            tracing::info!("Seeding admin user: {}", email);
            let hashed_password = hash_password(password)?;

            users.push(User {
                id: uuid::Uuid::new_v4().to_string(),
                name: config
                    .admin_name
                    .clone()
                    .unwrap_or_else(|| "Administrator".to_string()),
                email,
                password: hashed_password,
                is_teacher: true,
                created_at: Utc::now(),
            });
            store.save(store::USERS, &users).await?;
            tracing::info!("Admin user created successfully.");
        }
    }
    Ok(())
}
