use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_assistant_api::api;
use todo_assistant_api::assistant::OpenAiClient;
use todo_assistant_api::config::AppConfig;
use todo_assistant_api::infrastructure::database;
use todo_assistant_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_assistant_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    let mut state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = database::connect(&database_url, config.database_max_connections).await?;
            AppState::postgres(config, pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            AppState::in_memory(config)
        }
    };

    match state.config.llm.clone() {
        Some(llm) => {
            let client = OpenAiClient::new(&llm)?;
            state = state.with_completion_client(Arc::new(client));
            tracing::info!(model = %llm.model, "Chat assistant enabled");
        }
        None => tracing::warn!("OPENAI_API_KEY not set, chat assistant disabled"),
    }

    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    let app = api::router(state);

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
