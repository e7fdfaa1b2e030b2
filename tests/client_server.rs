use std::sync::{Arc, Mutex};
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use crate::common::records::{ann_and_bob, date, fields, synthesize};
use crate::common::{client_config, init_config, spawn_client, spawn_server};
use recordesk::client::ListReply;
use recordesk::server::MemoryStore;
use recordesk::{Dashboard, Error, Gender, RecordClient, RecordDraft, RecordStore};

mod common;

#[tokio::test]
async fn create_update_delete() -> Result<(), Box<dyn std::error::Error>>
{
	let store = MemoryStore::new();
	let (client, _) = spawn_client(store.clone()).await?;

	let created = client.create(&fields("Ann", 30)).await?;
	assert_eq!(created.id, 1);
	assert_eq!(created.name, "Ann");
	assert_eq!(store.len().await, 1);

	let mut changed = created.fields();
	changed.gender = Gender::Female;
	changed.address = "1 Elm Street".into();
	let updated = client.update(created.id, &changed).await?;
	assert_eq!(updated.id, created.id);
	assert_eq!(updated.created_date, created.created_date);
	assert_eq!(updated.gender, Gender::Female);
	assert_eq!(client.list().await?, vec![updated]);

	client.delete(created.id).await?;
	assert!(client.list().await?.is_empty());

	// ids are never handed out twice
	let next = client.create(&fields("Bob", 40)).await?;
	assert_eq!(next.id, 2);
	Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> Result<(), Box<dyn std::error::Error>>
{
	let (client, _) = spawn_client(MemoryStore::with_records(ann_and_bob())).await?;

	let deleted = client.delete(42).await;
	let Err(error) = deleted else {panic!("deleting a missing record should fail")};
	assert!(matches!(error.root_cause(), Error::Server {status:404, ..}), "got {error}");
	assert!(!error.is_network());

	let updated = client.update(42, &fields("Nobody", 1)).await;
	let Err(error) = updated else {panic!("updating a missing record should fail")};
	let Error::Server {status, message} = error.root_cause() else {panic!("got {error}")};
	assert_eq!(*status, 404);
	assert!(message.contains("42"), "message was '{message}'");
	Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_rejected() -> Result<(), Box<dyn std::error::Error>>
{
	let url = spawn_server(MemoryStore::new()).await?;
	let response = reqwest::Client::new()
		.post(format!("{url}/records"))
		.header("content-type", "application/json")
		.body(r#"{"name":"Ann","age":"old"}"#)
		.send().await?;
	assert_eq!(response.status(), 400);
	let body:serde_json::Value = response.json().await?;
	assert!(body.get("error").is_some());

	let response = reqwest::Client::new()
		.delete(format!("{url}/records/12"))
		.header("accept", "text/plain")
		.send().await?;
	assert_eq!(response.status(), 404);
	assert!(response.text().await?.contains("record 12 not found"));
	Ok(())
}

#[tokio::test]
async fn list_pages_and_search() -> Result<(), Box<dyn std::error::Error>>
{
	let (client, _) = spawn_client(MemoryStore::with_records(synthesize(45))).await?;
	let page_size = init_config().server.page_size;

	let everything = client.list_page(None, None).await?;
	assert_eq!(everything.records.len(), 45);
	assert_eq!(everything.total_count, 45);

	let first = client.list_page(Some(1), None).await?;
	assert_eq!(first.records.len(), page_size);
	assert_eq!(first.total_count, 45);
	assert_eq!(first.records.first().map(|r| r.id), Some(45), "pages start with the newest record");

	let last = client.list_page(Some(3), None).await?;
	assert_eq!(last.records.len(), 45 - 2 * page_size);

	let beyond = client.list_page(Some(9), None).await?;
	assert!(beyond.records.is_empty());
	assert_eq!(beyond.total_count, 45);

	let bobs = client.list_page(None, Some("BOB")).await?;
	assert!(bobs.records.iter().all(|r| r.name.to_lowercase().contains("bob")));
	assert_eq!(bobs.total_count, bobs.records.len());
	Ok(())
}

#[tokio::test]
async fn invalid_page_means_first_page() -> Result<(), Box<dyn std::error::Error>>
{
	let url = spawn_server(MemoryStore::with_records(synthesize(30))).await?;
	let body = reqwest::get(format!("{url}/records?page=zero")).await?.bytes().await?;
	let reply = ListReply::parse(&body)?;
	assert_eq!(reply.records.len(), init_config().server.page_size);
	assert_eq!(reply.records.first().map(|r| r.id), Some(30));
	Ok(())
}

#[test]
fn list_reply_shapes() -> Result<(), Box<dyn std::error::Error>>
{
	let bare = br#"[{"id":1,"name":"Ann","birthday":"1995-04-01","address":"","age":30,
		"gender":"female","contactNumber":"","createdDate":"2025-01-01"}]"#;
	let reply = ListReply::parse(bare)?;
	assert_eq!(reply.total_count, 1);
	assert_eq!(reply.records[0].gender, Gender::Female);

	let legacy = br#"{"patients":[{"id":7,"name":"Bob","birthday":"1985-02-03T00:00:00.000Z",
		"age":40,"gender":"Other","dateToday":"2024-12-24T10:30:00+01:00"}],"totalCount":12}"#;
	let reply = ListReply::parse(legacy)?;
	assert_eq!(reply.total_count, 12);
	let bob = &reply.records[0];
	assert_eq!(bob.birthday, date(1985, 2, 3));
	assert_eq!(bob.created_date, date(2024, 12, 24));
	assert_eq!(bob.gender, Gender::Unspecified);
	assert_eq!(bob.contact_number, "");

	for garbage in [&b"{\"message\":\"hello\"}"[..], b"<html></html>", b"[{\"id\":\"one\"}]"] {
		assert!(matches!(ListReply::parse(garbage), Err(Error::ResponseShape(_))));
	}
	Ok(())
}

#[tokio::test]
async fn export_endpoint() -> Result<(), Box<dyn std::error::Error>>
{
	let url = spawn_server(MemoryStore::with_records(ann_and_bob())).await?;
	let response = reqwest::get(format!("{url}/records/export")).await?;
	assert_eq!(response.status(), 200);
	let headers = response.headers();
	assert_eq!(headers.get("content-type").and_then(|v| v.to_str().ok()), Some("text/csv"));
	let disposition = headers.get("content-disposition").and_then(|v| v.to_str().ok()).unwrap_or_default();
	assert!(disposition.contains("records.csv"));
	let text = response.text().await?;
	assert_eq!(text.lines().count(), 4);
	assert!(text.lines().nth(3).is_some_and(|l| l.starts_with("3,Bob,")));
	Ok(())
}

#[tokio::test]
async fn server_info() -> Result<(), Box<dyn std::error::Error>>
{
	let url = spawn_server(MemoryStore::with_records(ann_and_bob())).await?;
	let info:serde_json::Value = reqwest::get(format!("{url}/info")).await?.json().await?;
	assert_eq!(info["records"], 3);
	assert_eq!(info["page_size"], 20);
	Ok(())
}

#[cfg(feature = "html")]
#[tokio::test]
async fn html_listing() -> Result<(), Box<dyn std::error::Error>>
{
	let url = spawn_server(MemoryStore::with_records(ann_and_bob())).await?;
	let page = reqwest::get(format!("{url}/html/records?search=ann&sort=age&dir=asc")).await?.text().await?;
	assert!(page.contains("2 matching records, page 1 of 1"));
	let marie = page.find("ann marie").ok_or("ann marie missing")?;
	let ann = page.find(">Ann<").ok_or("Ann missing")?;
	assert!(marie < ann, "younger record should come first");
	assert!(!page.contains("Bob"));

	let response = reqwest::get(format!("{url}/html/records?sort=shoe_size")).await?;
	assert_eq!(response.status(), 400);
	Ok(())
}

#[tokio::test]
async fn dashboard_over_http() -> Result<(), Box<dyn std::error::Error>>
{
	let (client, _) = spawn_client(MemoryStore::with_records(ann_and_bob())).await?;
	let dash = Dashboard::new(client, &init_config().view);
	dash.refresh().await?;
	assert_eq!(dash.view().derive().ids(), vec![3, 2, 1]);

	let draft = RecordDraft{
		name:"Carla".into(),
		birthday:"1990-06-15".into(),
		age:"35".into(),
		gender:"F".into(),
		..Default::default()
	};
	let carla = dash.save(&draft).await?.record;
	assert_eq!(carla.id, 4);
	assert_eq!(carla.gender, Gender::Female);
	assert_eq!(dash.view().records().len(), 4);

	for id in [1, 4] {dash.view_mut().toggle_selection(id);}
	let report = dash.bulk_delete().await?;
	assert!(report.is_complete());
	assert_eq!(dash.view().derive().ids(), vec![3, 2]);
	assert!(dash.view().selection().is_empty());
	Ok(())
}

#[tokio::test]
async fn unreachable_store() -> Result<(), Box<dyn std::error::Error>>
{
	// nothing listens on the discard port
	let mut config = client_config("http://127.0.0.1:9");
	config.timeout_secs = 2;
	let client = RecordClient::new(&config)?;
	let error = client.list().await.err().ok_or("listing should fail")?;
	assert!(error.is_network(), "got {error}");

	let dash = Dashboard::new(client, &init_config().view);
	assert!(dash.refresh().await.is_err());
	assert!(dash.view().records().is_empty());
	Ok(())
}

type SeenTokens = Arc<Mutex<Vec<Option<String>>>>;

/// a `/records` that lists nothing but remembers each request's Authorization header
async fn spawn_token_recorder() -> Result<(String, SeenTokens), Box<dyn std::error::Error>>
{
	let seen = SeenTokens::default();
	let app = axum::Router::new()
		.route("/records", axum::routing::get(|State(seen):State<SeenTokens>, headers:HeaderMap| async move {
			let token = headers.get(header::AUTHORIZATION)
				.and_then(|v| v.to_str().ok())
				.map(str::to_string);
			seen.lock().expect("token log poisoned").push(token);
			Json(serde_json::json!([]))
		}))
		.with_state(seen.clone());
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
	let url = format!("http://{}", listener.local_addr()?);
	tokio::spawn(async move {axum::serve(listener, app).await});
	Ok((url, seen))
}

#[tokio::test]
async fn bearer_tokens() -> Result<(), Box<dyn std::error::Error>>
{
	let (url, seen) = spawn_token_recorder().await?;
	let mut config = client_config(&url);
	RecordClient::new(&config)?.list().await?;

	config.token = Some("s3cret".into());
	RecordClient::new(&config)?.list().await?;

	let var = format!("BEARER_FOR_TEST_{}", rand::random::<u32>());
	config.token = None;
	config.token_env = Some(var.clone());
	let client = RecordClient::new(&config)?;
	std::env::set_var(&var, "from-env");
	client.list().await?;
	// the variable is read on every request
	std::env::set_var(&var, "rotated");
	client.list().await?;
	std::env::remove_var(&var);
	client.list().await?;

	let seen = seen.lock().expect("token log poisoned").clone();
	assert_eq!(seen, vec![
		None,
		Some("Bearer s3cret".to_string()),
		Some("Bearer from-env".to_string()),
		Some("Bearer rotated".to_string()),
		None,
	]);
	Ok(())
}
