mod list_reply;

use reqwest::{Client, RequestBuilder, Response};
use tracing;
use crate::config::ClientConfig;
use crate::record::{Record, RecordFields, RecordId};
use crate::tools::{Context, Error, Result};

pub use list_reply::ListReply;

/// The four calls the dashboard needs from wherever the records live.
#[allow(async_fn_in_trait)]
pub trait RecordStore
{
	/// the complete, current set of records
	async fn list(&self) -> Result<Vec<Record>>;
	async fn create(&self, fields:&RecordFields) -> Result<Record>;
	async fn update(&self, id:RecordId, fields:&RecordFields) -> Result<Record>;
	async fn delete(&self, id:RecordId) -> Result<()>;
}

/// Source of the bearer token attached to each request.
pub trait Credentials
{
	fn bearer_token(&self) -> Option<String>;
}

pub struct NoCredentials;
impl Credentials for NoCredentials
{
	fn bearer_token(&self) -> Option<String> {None}
}

pub struct StaticToken(pub String);
impl Credentials for StaticToken
{
	fn bearer_token(&self) -> Option<String> {Some(self.0.clone())}
}

/// reads the token from the named environment variable on every request
pub struct EnvToken(pub String);
impl Credentials for EnvToken
{
	fn bearer_token(&self) -> Option<String> {
		std::env::var(&self.0).ok().filter(|t|!t.is_empty())
	}
}

pub fn credentials_from(config:&ClientConfig) -> Box<dyn Credentials + Send + Sync>
{
	match (&config.token, &config.token_env) {
		(Some(token),_) => Box::new(StaticToken(token.clone())),
		(None,Some(var)) => Box::new(EnvToken(var.clone())),
		(None,None) => Box::new(NoCredentials)
	}
}

/// Typed HTTP client for the `/records` REST surface.
pub struct RecordClient
{
	http:Client,
	records_url:String,
	credentials:Box<dyn Credentials + Send + Sync>,
}

impl RecordClient
{
	pub fn new(config:&ClientConfig) -> Result<RecordClient>
	{
		Self::with_credentials(config,credentials_from(config))
	}

	pub fn with_credentials(config:&ClientConfig, credentials:Box<dyn Credentials + Send + Sync>) -> Result<RecordClient>
	{
		let http = Client::builder()
			.timeout(config.timeout())
			.build()
			.context("building http client")?;
		Ok(RecordClient{
			http,
			records_url:format!("{}/records",config.base_url.trim_end_matches('/')),
			credentials,
		})
	}

	pub fn records_url(&self) -> &str {&self.records_url}

	fn url_for(&self, id:RecordId) -> String
	{
		format!("{}/{id}",self.records_url)
	}

	fn authorize(&self, request:RequestBuilder) -> RequestBuilder
	{
		match self.credentials.bearer_token() {
			Some(token) => request.bearer_auth(token),
			None => request
		}
	}

	/// sends the request and turns any non-2xx answer into [Error::Server]
	async fn send(&self, request:RequestBuilder) -> Result<Response>
	{
		let response = self.authorize(request).send().await?;
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		let body = response.text().await.unwrap_or_default();
		let message = serde_json::from_str::<serde_json::Value>(&body).ok()
			.and_then(|v|v.get("error").and_then(|e|e.as_str()).map(str::to_string))
			.unwrap_or(body);
		Err(Error::Server {status:status.as_u16(),message})
	}

	/// One page of records as the store pages them, optionally filtered by name.
	pub async fn list_page(&self, page:Option<u32>, search:Option<&str>) -> Result<ListReply>
	{
		let mut query:Vec<(&str,String)> = Vec::new();
		if let Some(page) = page {query.push(("page",page.to_string()));}
		if let Some(search) = search {query.push(("search",search.to_string()));}
		tracing::debug!("GET {} {:?}",self.records_url,query);
		let request = self.http.get(&self.records_url).query(&query);
		let response = self.send(request).await.context("listing records")?;
		let body = response.bytes().await.context("reading record list")?;
		ListReply::parse(&body)
	}
}

impl RecordStore for RecordClient
{
	async fn list(&self) -> Result<Vec<Record>>
	{
		self.list_page(None,None).await.map(|reply|reply.records)
	}

	async fn create(&self, fields:&RecordFields) -> Result<Record>
	{
		tracing::debug!("POST {} for {}",self.records_url,fields.name);
		let request = self.http.post(&self.records_url).json(fields);
		let ctx = format!("creating record for {}",fields.name);
		let response = self.send(request).await.context(ctx.as_str())?;
		response.json::<Record>().await.context(ctx)
	}

	async fn update(&self, id:RecordId, fields:&RecordFields) -> Result<Record>
	{
		let url = self.url_for(id);
		tracing::debug!("PUT {url}");
		let ctx = format!("updating record {id}");
		let response = self.send(self.http.put(url).json(fields)).await.context(ctx.as_str())?;
		response.json::<Record>().await.context(ctx)
	}

	async fn delete(&self, id:RecordId) -> Result<()>
	{
		let url = self.url_for(id);
		tracing::debug!("DELETE {url}");
		self.send(self.http.delete(url)).await
			.map(|_|())
			.context(format!("deleting record {id}"))
	}
}
