use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use axum::response::{IntoResponse, Response};
use mime::Mime;
use serde_json::json;
use thiserror::Error;
use crate::tools;

#[derive(Error,Debug)]
pub enum InnerHttpError {
	#[error("internal error {0}")]
	Internal(tools::Error),
	#[error("Bad request {message}")]
	BadRequest {message:String},
}

impl<T> From<T> for InnerHttpError
where tools::Error:From<T>
{
	fn from(error: T) -> Self
	{
		InnerHttpError::Internal(error.into())
	}
}

impl InnerHttpError
{
	fn internal_status_code(error:&tools::Error) -> StatusCode
	{
		match error.root_cause() {
			tools::Error::NotFound {..} => StatusCode::NOT_FOUND,
			tools::Error::InvalidDraft(_) | tools::Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR
		}
	}
	pub fn status_code(&self) -> StatusCode
	{
		match &self {
			InnerHttpError::Internal(e) => Self::internal_status_code(e),
			InnerHttpError::BadRequest { .. } => StatusCode::BAD_REQUEST
		}
	}
	pub fn do_trace(&self)
	{
		match self {
			InnerHttpError::Internal(e) => {
				match e.root_cause() {
					tools::Error::NotFound {id} => tracing::debug!("{id} reported as not found"),
					root => tracing::error!("internal error {} reported (root cause '{}')", e, root),
				}
			}
			_ => tracing::error!("http error {} reported", self),
		}
	}
}

pub(crate) fn get_mime(headers:&HeaderMap<HeaderValue>) -> Option<Mime>
{
	headers.get(header::ACCEPT)
		.and_then(|v|v.to_str().ok())
		.and_then(|v|v.split(',').next())
		.and_then(|v|v.trim().parse::<Mime>().ok())
}

/// plain text only for clients that explicitly ask for text, everyone else gets json
pub(crate) fn wants_text(mime:&Mime) -> bool
{
	mime.type_() == mime::TEXT
}

pub struct HttpError
{
	inner: InnerHttpError,
	mime: Option<Mime>
}

impl HttpError
{
	pub fn new<T>(error:T, headers:&HeaderMap<HeaderValue>)->Self where InnerHttpError:From<T>
	{
		HttpError {inner: InnerHttpError::from(error),mime:get_mime(headers)}
	}
	pub fn bad_request<T>(message:T, headers:&HeaderMap<HeaderValue>) -> Self where T:ToString
	{
		Self::new(InnerHttpError::BadRequest {message:message.to_string()},headers)
	}
}

impl IntoResponse for HttpError {
	fn into_response(self) -> Response {
		self.inner.do_trace();
		let status_code = self.inner.status_code();
		if self.mime.as_ref().is_some_and(wants_text) {
			let sources:Vec<_>=tools::Source { current: Some( &self.inner ) }.map(<dyn std::error::Error>::to_string).collect();
			(
				status_code,
				sources.join("\n")
			).into_response()
		} else {
			let err= match &self.inner {
				InnerHttpError::Internal(e) => serde_json::Value::from(e),
				InnerHttpError::BadRequest {..} => json!({"error":self.inner.to_string()}),
			};
			(status_code,Json(err)).into_response()
		}
	}
}

pub trait IntoHttpError{
	type V;
	fn into_http_error(self,headers:&HeaderMap<HeaderValue>) -> Result<Self::V, HttpError>;
}

impl<T,E> IntoHttpError for Result<T,E> where InnerHttpError:From<E>
{
	type V=T;

	fn into_http_error(self, headers: &HeaderMap<HeaderValue>) -> Result<Self::V, HttpError> {
		self.map_err(|err| HttpError::new(err, headers))
	}
}
