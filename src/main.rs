mod cli;

use itertools::Itertools;
use recordesk::config::{self, AppConfig};
use recordesk::record::Record;
use recordesk::server::{self, MemoryStore};
use recordesk::tools::{self, Context};
use recordesk::view::{Applied, SortDirection, ViewPage};
use recordesk::{Dashboard, RecordClient, RecordDraft, RecordField};
use tokio::net::TcpListener;
use cli::Commands;

fn print_page(page:&ViewPage)
{
	println!("{}",RecordField::ALL.iter().map(RecordField::wire_name).join("\t"));
	for record in &page.rows {
		println!("{}",record.cells().join("\t"));
	}
	println!("-- page {} of {} ({} matching)",page.page,page.total_pages,page.total_matches);
}

fn print_saved(action:&str, saved:&Applied<Record>)
{
	let record = &saved.record;
	println!("{action} record {}: {}",record.id,record.cells().join("\t"));
	if let Some(e) = &saved.refresh_error {
		eprintln!("the change was saved, but the record list could not be reloaded: {e}");
	}
}

async fn serve(config:&AppConfig, address:Option<String>, seed:Option<std::path::PathBuf>) -> tools::Result<()>
{
	let store = match seed {
		Some(file) => {
			let ctx = format!("reading seed records from {}",file.to_string_lossy());
			let data = tokio::fs::read(&file).await.context(ctx.as_str())?;
			let records:Vec<Record> = serde_json::from_slice(&data).context(ctx)?;
			MemoryStore::with_records(records)
		}
		None => MemoryStore::new()
	};
	let address = address.unwrap_or_else(||config.server.address.clone());
	let bound = TcpListener::bind(&address).await.context(format!("binding to {address}"))?;
	server::serve(bound,store,config.server.clone()).await
}

async fn run(command:Commands, config:&AppConfig) -> tools::Result<()>
{
	let dashboard = Dashboard::new(RecordClient::new(&config.client)?,&config.view);
	dashboard.refresh().await?;
	match command {
		Commands::List { search, sort, desc, page } => {
			let mut view = dashboard.view_mut();
			view.set_search(search);
			if let Some(field) = sort {
				let dir = if desc {SortDirection::Descending} else {SortDirection::Ascending};
				view.set_sort(field.parse()?,dir);
			}
			view.go_to_page(page);
			print_page(&view.derive());
		}
		Commands::Add { fields } => {
			let mut draft = RecordDraft::default();
			fields.apply_to(&mut draft);
			print_saved("created",&dashboard.save(&draft).await?);
		}
		Commands::Edit { id, fields } => {
			let existing = dashboard.view().records().iter().find(|r|r.id == id).cloned()
				.ok_or(tools::Error::NotFound {id})?;
			let mut draft = RecordDraft::from(&existing);
			fields.apply_to(&mut draft);
			print_saved("updated",&dashboard.save(&draft).await?);
		}
		Commands::Delete { ids } => {
			{
				let mut view = dashboard.view_mut();
				view.clear_selection();
				for id in ids {view.toggle_selection(id);}
			}
			let report = dashboard.bulk_delete().await?;
			for id in &report.deleted {println!("deleted record {id}");}
			for (id,e) in &report.failed {eprintln!("failed to delete record {id}: {e}");}
			if let Some(e) = report.refresh_error {return Err(e);}
			let failed = report.failed.len();
			if let Some((id,e)) = report.failed.into_iter().next() {
				return Err::<(),_>(e).context(format!("{failed} deletes failed, first was record {id}"));
			}
		}
		Commands::Export { file } => {
			let written = dashboard.export_to_path(&file)?;
			println!("exported {written} records to {}",file.to_string_lossy());
		}
		Commands::WriteConfig {..} | Commands::Serve {..} => unreachable!("handled in main"),
	}
	Ok(())
}

#[tokio::main]
async fn main() -> tools::Result<()>
{
	let args = cli::parse();
	let mut config = config::load(args.config)?;
	if let Some(server) = args.server {
		config.client.base_url = server;
	}

	match args.command {
		Commands::WriteConfig { file } => config::write(file)?,
		Commands::Serve { address, seed } => serve(&config,address,seed).await?,
		command => run(command,&config).await?,
	}
	Ok(())
}
