use std::path::PathBuf;
use std::time::Duration;
use byte_unit::Byte;
use config::{Config, ConfigError, Environment, File, FileFormat::Toml};
use serde::Deserialize;
use crate::tools::{Context, Result};

static CONFIG_STR:&str = r#"
[client]
base_url = "http://127.0.0.1:4000" # the record store, "/records" is appended
timeout_secs = 30
# token = "secret" # static bearer token sent with every request
# token_env = "RECORDESK_TOKEN" # or take the bearer token from this environment variable

[view]
page_size = 20 # rows per page in the dashboard

[server]
address = "127.0.0.1:4000"
page_size = 20 # rows per page for GET /records?page=N
upload_sizelimit = "1 MiB"
"#;

#[derive(Deserialize,Debug,Clone)]
pub struct ClientConfig
{
	pub base_url:String,
	pub timeout_secs:u64,
	pub token:Option<String>,
	pub token_env:Option<String>,
}

impl ClientConfig
{
	pub fn timeout(&self) -> Duration {Duration::from_secs(self.timeout_secs)}
}

#[derive(Deserialize,Debug,Clone)]
pub struct ViewConfig
{
	pub page_size:usize,
}

#[derive(Deserialize,Debug,Clone)]
pub struct ServerConfig
{
	pub address:String,
	pub page_size:usize,
	pub upload_sizelimit:Byte,
}

/// Everything configurable, loaded once and handed to whoever needs it.
#[derive(Deserialize,Debug,Clone)]
pub struct AppConfig
{
	pub client:ClientConfig,
	pub view:ViewConfig,
	pub server:ServerConfig,
}

impl Default for AppConfig
{
	fn default() -> Self {
		load(None).expect("the embedded default configuration must be valid")
	}
}

/// Layers the built-in defaults, the given file and `RECORDESK_<SECTION>__<KEY>` environment variables.
pub fn load(config_file:Option<PathBuf>) -> Result<AppConfig>
{
	let mut builder = Config::builder()
		.add_source(File::from_str(CONFIG_STR,Toml));
	if let Some(filename) = &config_file {
		builder=builder.add_source(File::from(filename.as_path()).format(Toml));
	}
	builder = builder.add_source(
		Environment::with_prefix("RECORDESK")
			.prefix_separator("_")
			.separator("__")
			.try_parsing(true)
	);
	let ctx = match &config_file {
		Some(file) => format!("loading configuration from {}",file.to_string_lossy()),
		None => "loading default configuration".to_string()
	};
	let config:AppConfig = builder.build()
		.and_then(Config::try_deserialize::<AppConfig>)
		.context(ctx.as_str())?;
	if config.view.page_size == 0 || config.server.page_size == 0 {
		return Err::<AppConfig,_>(ConfigError::Message("page_size must be at least 1".into())).context(ctx);
	}
	Ok(config)
}

pub fn write(path:PathBuf) -> Result<()>
{
	let ctx = format!("writing default configuration to {}",path.to_string_lossy());
	std::fs::write(path,CONFIG_STR).context(ctx)
}
