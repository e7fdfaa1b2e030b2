use serde_json::json;
use thiserror::Error;
use crate::record::RecordId;

#[derive(Error,Debug)]
pub enum Error
{
	#[error("request failed {0}")]
	Network(#[source] reqwest::Error),

	#[error("server answered {status}: {message}")]
	Server{status:u16,message:String},

	#[error("unexpected response shape ({0})")]
	ResponseShape(String),

	#[error("invalid record: {0}")]
	InvalidDraft(String),

	#[error("invalid query: {0}")]
	InvalidQuery(String),

	#[error("another change is still being submitted")]
	MutationInProgress,

	#[error("record {id} not found")]
	NotFound{id:RecordId},

	#[error("Json error {0}")]
	JsonError(#[from] serde_json::Error),

	#[error("io error {0}")]
	IoError(#[from] std::io::Error),

	#[error("csv error {0}")]
	CsvError(#[from] csv::Error),

	#[error("configuration error {0}")]
	ConfigError(#[from] config::ConfigError),

	#[error("{source} when {context}")]
	Context{
		source:Box<Error>,
		context:String
	},
}

impl From<reqwest::Error> for Error
{
	fn from(error: reqwest::Error) -> Self
	{
		if error.is_decode() {
			Error::ResponseShape(error.to_string())
		} else if let Some(status) = error.status() {
			Error::Server {status:status.as_u16(),message:error.to_string()}
		} else {
			Error::Network(error)
		}
	}
}

impl Error {
	pub(crate) fn context<T>(self, context:T) -> Error where String:From<T>
	{
		Error::Context {source:Box::new(self),context:context.into()}
	}
	pub(crate) fn context_from<E,T>(error:E,context:T) -> Error where String:From<T>, Error:From<E>
	{
		Error::from(error).context(context)
	}
	/// the innermost error, looking through all context layers
	pub fn root_cause(&self) -> &Error
	{
		match self {
			Error::Context {source,..} => source.root_cause(),
			_ => self
		}
	}
	/// whether the request reached the store and was answered at all
	pub fn is_network(&self) -> bool
	{
		matches!(self.root_cause(), Error::Network(_))
	}
}

impl From<&Error> for serde_json::Value
{
	fn from(error: &Error) -> Self
	{
		let chain:Vec<_> = Source {current:Some(error)}.map(|e|e.to_string()).collect();
		match error.root_cause() {
			Error::NotFound {id} => json!({"error":error.to_string(),"id":id,"chain":chain}),
			_ => json!({"error":error.to_string(),"chain":chain})
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait Context{
	type V;
	fn context<C>(self,context:C) -> Result<Self::V> where String:From<C>;
}

impl<T,E> Context for std::result::Result<T,E> where Error:From<E>
{
	type V=T;

	fn context<C>(self, context: C) -> Result<Self::V> where String: From<C> {
		self.map_err(|e|Error::context_from(e,context))
	}
}

/// walks the chain of [std::error::Error::source]
pub struct Source<'a> {
	pub current: Option<&'a (dyn std::error::Error + 'static)>,
}

impl<'a> Iterator for Source<'a> {
	type Item = &'a (dyn std::error::Error + 'static);

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.current;
		self.current = self.current.and_then(std::error::Error::source);
		current
	}
}
