#![allow(dead_code)]
pub mod records;
pub mod flaky;

use recordesk::config::{AppConfig, ClientConfig};
use recordesk::server::{self, MemoryStore};
use recordesk::RecordClient;
use tokio::net::TcpListener;

pub fn init_config() -> AppConfig
{
	AppConfig::default()
}

/// runs the reference server on an ephemeral port, returns its base url
pub async fn spawn_server(store:MemoryStore) -> Result<String, Box<dyn std::error::Error>>
{
	let config = init_config();
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let address = listener.local_addr()?;
	let app = server::app(store, config.server);
	tokio::spawn(async move {
		axum::serve(listener, app.into_make_service()).await
	});
	Ok(format!("http://{address}"))
}

pub fn client_config(base_url:&str) -> ClientConfig
{
	let mut config = init_config().client;
	config.base_url = base_url.to_string();
	config
}

pub async fn spawn_client(store:MemoryStore) -> Result<(RecordClient, String), Box<dyn std::error::Error>>
{
	let url = spawn_server(store).await?;
	let client = RecordClient::new(&client_config(&url))?;
	Ok((client, url))
}
