use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use crate::record::{Record, RecordFields, RecordId};
use crate::server::http_error::{HttpError, IntoHttpError};
use crate::server::AppState;
use crate::tools::export;

pub(super) fn router() -> axum::Router<AppState>
{
	axum::Router::new()
		.route("/records",get(list_records).post(create_record))
		.route("/records/export",get(export_records))
		.route("/records/{id}",put(update_record).delete(delete_record))
}

#[derive(Deserialize)]
pub(super) struct ListParams
{
	page:Option<String>,
	search:Option<String>,
}

impl ListParams
{
	/// anything that isn't a page number from 1 on means the first page
	fn page(&self) -> Option<usize>
	{
		self.page.as_ref().map(|p|p.trim().parse::<usize>().ok().filter(|p|*p>0).unwrap_or(1))
	}
}

async fn list_records(State(state):State<AppState>, Query(params):Query<ListParams>) -> Json<serde_json::Value>
{
	let matching = state.store.search(params.search.as_deref().unwrap_or_default()).await;
	let total_count = matching.len();
	let records:Vec<Record> = match params.page() {
		Some(page) => {
			let size = state.config.page_size;
			matching.into_iter().skip((page-1)*size).take(size).collect()
		}
		None => matching
	};
	tracing::debug!("listing {} of {total_count} records",records.len());
	Json(json!({"records":records,"totalCount":total_count}))
}

async fn create_record(
	State(state):State<AppState>,
	headers:HeaderMap,
	payload:Result<Json<RecordFields>,JsonRejection>
) -> Result<(StatusCode,Json<Record>), HttpError>
{
	let Json(fields) = payload.map_err(|e|HttpError::bad_request(e.body_text(),&headers))?;
	let record = state.store.insert(fields).await;
	Ok((StatusCode::CREATED,Json(record)))
}

async fn update_record(
	State(state):State<AppState>,
	headers:HeaderMap,
	Path(id):Path<RecordId>,
	payload:Result<Json<RecordFields>,JsonRejection>
) -> Result<Json<Record>, HttpError>
{
	let Json(fields) = payload.map_err(|e|HttpError::bad_request(e.body_text(),&headers))?;
	state.store.replace(id,fields).await.map(Json).into_http_error(&headers)
}

async fn delete_record(
	State(state):State<AppState>,
	headers:HeaderMap,
	Path(id):Path<RecordId>
) -> Result<StatusCode, HttpError>
{
	state.store.remove(id).await.into_http_error(&headers)?;
	Ok(StatusCode::NO_CONTENT)
}

async fn export_records(State(state):State<AppState>, headers:HeaderMap) -> Result<Response, HttpError>
{
	let records = state.store.all().await;
	let csv = export::to_csv_bytes(&records).into_http_error(&headers)?;
	let disposition = format!(r#"attachment; filename="{}""#,export::EXPORT_FILENAME);
	Ok((
		StatusCode::OK,
		[
			(header::CONTENT_TYPE, export::EXPORT_MIME.to_string()),
			(header::CONTENT_DISPOSITION, disposition)
		],
		csv
	).into_response())
}
