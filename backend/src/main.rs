use anyhow::{Context, Result};
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};
use venn_core::{DiagramSession, EngineConfig};

mod protocol;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

// Application State
struct AppState {
    config: EngineConfig,
}

/// Reads the engine config from the file named by `VENN_CONFIG`, if set.
fn load_config() -> Result<EngineConfig> {
    match std::env::var("VENN_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path))?;
            let config = EngineConfig::from_json(&text)
                .with_context(|| format!("parsing config file {}", path))?;
            info!("Loaded config from {}", path);
            Ok(config)
        }
        Err(_) => Ok(EngineConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    let addr: SocketAddr = std::env::var("VENN_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("VENN_ADDR is not a socket address")?;

    let shared_state = Arc::new(AppState { config });

    let mut app = Router::new()
        .route("/", get(root))
        .route("/ws", get(ws_handler));

    // Optionally serve a built front end alongside the socket
    if let Ok(dir) = std::env::var("VENN_STATIC_DIR") {
        info!("serving static files from {}", dir);
        app = app.nest_service("/app", ServeDir::new(dir));
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn root() -> &'static str {
    "Hello from Venn Backend!"
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let span = tracing::info_span!("session", id = %uuid::Uuid::new_v4());
    ws.on_upgrade(move |socket| handle_socket(socket, state).instrument(span))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("Client connected");
    let (mut sender, mut receiver) = socket.split();

    // Each connection owns its diagram; passes never run concurrently on it
    let mut session = DiagramSession::new(state.config.clone());

    for reply in protocol::handle_command(&mut session, "REFRESH") {
        if sender.send(Message::Text(reply)).await.is_err() {
            return;
        }
    }

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("WebSocket error: {}", e);
                return;
            }
        };

        match msg {
            Message::Text(text) => {
                info!("Received message: {}", text);
                for reply in protocol::handle_command(&mut session, &text) {
                    if sender.send(Message::Text(reply)).await.is_err() {
                        return;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("Client disconnected");
}
