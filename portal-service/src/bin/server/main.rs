use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use portal_service::config::Config;
use portal_service::config::StorageBackend;
use portal_service::domain::user::models::EmailAddress;
use portal_service::domain::user::models::Password;
use portal_service::domain::user::models::PasswordPolicy;
use portal_service::domain::user::ports::AuthServicePort;
use portal_service::domain::user::ports::UserRepository;
use portal_service::domain::user::ports::UserServicePort;
use portal_service::domain::user::service::AuthService;
use portal_service::domain::user::service::UserService;
use portal_service::inbound::http::router::create_router;
use portal_service::inbound::http::session::SessionSettings;
use portal_service::outbound::repositories::InMemoryUserRepository;
use portal_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Services = (Arc<dyn AuthServicePort>, Arc<dyn UserServicePort>);

fn build_services<R: UserRepository>(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Services {
    (
        Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        )),
        Arc::new(UserService::new(repository, authenticator)),
    )
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "portal-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        token_ttl_hours = config.jwt.expiration_hours,
        secure_cookie = config.session.secure_cookie,
        "Configuration loaded"
    );

    if config.jwt.uses_development_secret() {
        tracing::warn!("jwt.secret is not set; signing tokens with the development key");
    }

    let password_hasher = PasswordHasher::with_cost(
        config.security.hash_memory_kib,
        config.security.hash_iterations,
        config.security.hash_parallelism,
    )?;
    let token_ttl = chrono::Duration::hours(config.jwt.expiration_hours);
    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret_or_default().as_bytes())
            .with_password_hasher(password_hasher)
            .with_token_ttl(token_ttl),
    );

    let (auth_service, user_service) = match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_services(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                Arc::clone(&authenticator),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory user store; accounts are lost on restart");
            build_services(
                Arc::new(InMemoryUserRepository::new()),
                Arc::clone(&authenticator),
            )
        }
    };

    let password_policy = PasswordPolicy {
        min_length: config.security.password_min_length,
    };

    if let Some(seed) = &config.seed {
        let email = EmailAddress::new(seed.admin_email.clone())?;
        let password = Password::new(seed.admin_password.clone(), &password_policy)?;
        user_service.ensure_admin(email, password).await?;
    }

    let session = SessionSettings {
        secure: config.session.secure_cookie,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, user_service, session, password_policy);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
