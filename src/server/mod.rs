//! Reference implementation of the record store's REST surface.

use axum::{Json, Router};
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::signal;
use tracing;
use crate::config::ServerConfig;
use crate::tools::Result;

#[cfg(feature = "html")]
mod html;
mod records;
mod http_error;
mod store;

pub use store::MemoryStore;

#[derive(Clone)]
pub(crate) struct AppState
{
	pub(crate) store:MemoryStore,
	pub(crate) config:ServerConfig,
}

#[derive(Serialize,Clone)]
pub struct Info
{
	version:String,
	pub records:usize,
	pub page_size:usize,
}

pub async fn server_info(store:&MemoryStore, config:&ServerConfig) -> Info
{
	Info{
		version:format!("{} v{}",env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
		records:store.len().await,
		page_size:config.page_size,
	}
}

async fn info(State(state):State<AppState>) -> Json<Info>
{
	Json(server_info(&state.store,&state.config).await)
}

/// the complete application, without binding it anywhere
pub fn app(store:MemoryStore, config:ServerConfig) -> Router
{
	let limit = config.upload_sizelimit.as_u64() as usize;
	let state = AppState{store,config};
	let mut app = Router::new()
		.merge(records::router())
		.route("/info", get(info));
	#[cfg(feature = "html")]
	{
		app = app.nest("/html", html::router());
	}
	app.layer(DefaultBodyLimit::max(limit)).with_state(state)
}

pub async fn serve(listener:TcpListener, store:MemoryStore, config:ServerConfig) -> Result<()>
{
	tracing::info!("listening on http://{}", listener.local_addr()?);
	tracing::info!("serving {} records, {} per page", store.len().await, config.page_size);

	axum::serve(listener,app(store,config).into_make_service())
		.with_graceful_shutdown(shutdown_signal())
		.await.map_err(|e|e.into())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
		eprintln!("Got CTRL+C trying graceful shutdown");
	};

	#[cfg(unix)]
		let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
		eprintln!("Got SIGTERM trying graceful shutdown");
	};

	#[cfg(not(unix))]
		let terminate = std::future::pending::<()>();

	tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
