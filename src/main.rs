use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::{Parser, Subcommand};
use sqlx::{Pool, Postgres};
use tracing::{error, info, warn};

use job_board::{
    api::{self, auth::password::hash_password, job::JobService},
    config::Config,
    db::{self, AccountRepository, AccountStore, JobRepository, JobStore, MemoryStore},
    shutdown::ShutdownCoordinator,
    telemetry,
};

#[derive(Parser)]
#[command(name = "job-board", about = "Job board web application")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations and start the HTTP server (the default)
    Serve {
        /// Keep all data in process memory instead of PostgreSQL
        #[arg(long)]
        ephemeral: bool,
    },
    /// Apply pending database migrations and exit
    Migrate,
    /// Register a user from the command line
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn startup_error(msg: impl std::fmt::Display) -> io::Error {
    error!("{}", msg);
    io::Error::new(io::ErrorKind::Other, msg.to_string())
}

async fn connect(config: &Config) -> io::Result<Pool<Postgres>> {
    let database_url = config.require_database_url().map_err(startup_error)?;
    let pool = db::connection::get_connection(database_url, config.max_db_connections)
        .await
        .map_err(|e| startup_error(format!("Failed to connect to database: {}", e)))?;
    info!("Database connection pool established");
    Ok(pool)
}

async fn migrate(pool: &Pool<Postgres>) -> io::Result<()> {
    db::migrations::run_migrations(pool)
        .await
        .map_err(|e| startup_error(format!("Failed to run database migrations: {}", e)))
}

async fn serve(config: Config, ephemeral: bool) -> io::Result<()> {
    info!("Starting job-board application");
    info!("  - Listening on {}:{}", config.bind_address, config.port);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Session lifetime: {} hours", config.session_ttl_hours);

    let (jobs, accounts, pool): (Arc<dyn JobStore>, Arc<dyn AccountStore>, _) = if ephemeral {
        warn!("Serving from an in-memory store; all data is lost on exit");
        let store = Arc::new(MemoryStore::new());
        let jobs: Arc<dyn JobStore> = store.clone();
        let accounts: Arc<dyn AccountStore> = store;
        (jobs, accounts, None)
    } else {
        info!("  - Max database connections: {}", config.max_db_connections);
        let pool = connect(&config).await?;
        migrate(&pool).await?;
        let jobs: Arc<dyn JobStore> = Arc::new(JobRepository::new(pool.clone()));
        let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(pool.clone()));
        (jobs, accounts, Some(pool))
    };

    let job_service = web::Data::new(JobService::new(jobs.clone()));
    let job_store: web::Data<dyn JobStore> = web::Data::from(jobs);
    let account_store: web::Data<dyn AccountStore> = web::Data::from(accounts);
    let auth_settings = web::Data::new(config.auth_settings());
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(job_service.clone())
            .app_data(job_store.clone())
            .app_data(account_store.clone())
            .app_data(auth_settings.clone())
            .configure(api::body_limits(max_payload_size))
            .configure(api::routes)
    })
    .disable_signals()
    .bind((config.bind_address.as_str(), config.port))?
    .run();

    info!("Server starting on http://{}:{}", config.bind_address, config.port);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}

async fn create_user(config: Config, username: String, password: String) -> io::Result<()> {
    let pool = connect(&config).await?;
    migrate(&pool).await?;

    let hashed = hash_password(&password, config.bcrypt_cost)
        .await
        .map_err(startup_error)?;
    let id = AccountRepository::new(pool.clone())
        .create_user(&username, &hashed)
        .await
        .map_err(|e| startup_error(format!("Failed to create user {}: {}", username, e)))?;

    info!("Created user {} with id={}", username, id);
    pool.close().await;
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    telemetry::init(&config.log_dir)?;

    match cli.command.unwrap_or(Command::Serve { ephemeral: false }) {
        Command::Serve { ephemeral } => serve(config, ephemeral).await,
        Command::Migrate => {
            let pool = connect(&config).await?;
            migrate(&pool).await?;
            pool.close().await;
            Ok(())
        }
        Command::CreateUser { username, password } => create_user(config, username, password).await,
    }
}
