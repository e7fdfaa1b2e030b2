use std::path::PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap::builder::PossibleValue;
use clap::ValueHint::{FilePath, Url};
use recordesk::{RecordDraft, RecordId};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub(super) struct LogLevel(Level);

impl ValueEnum for LogLevel
{
	fn value_variants<'a>() -> &'a [Self]
	{
		&[
			LogLevel(Level::TRACE),
			LogLevel(Level::DEBUG),
			LogLevel(Level::INFO),
			LogLevel(Level::WARN),
			LogLevel(Level::ERROR)
		]
	}

	fn to_possible_value(&self) -> Option<PossibleValue> {
		let alias= self.0.to_string().to_lowercase();
		Some(PossibleValue::new(self.0.as_str()).alias(alias))
	}
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(super) struct Cli {
	#[command(subcommand)]
	pub(super) command: Commands,
	/// config file
	#[arg(long, value_hint = FilePath)]
	pub(super) config: Option<PathBuf>,
	/// base url of the record store (overrides the config)
	#[arg(long, value_hint = Url)]
	pub(super) server: Option<String>,
	/// logging level (RUST_LOG takes precedence)
	#[arg(long, default_value = Level::WARN.as_str())]
	pub(super) log_level:LogLevel
}

/// the editable fields, as typed on the command line
#[derive(Args,Debug,Default)]
pub(super) struct FieldArgs {
	#[arg(long)]
	pub(super) name:Option<String>,
	/// date of birth as YYYY-MM-DD
	#[arg(long)]
	pub(super) birthday:Option<String>,
	#[arg(long)]
	pub(super) address:Option<String>,
	#[arg(long)]
	pub(super) age:Option<String>,
	/// male, female or anything else for unspecified
	#[arg(long)]
	pub(super) gender:Option<String>,
	#[arg(long)]
	pub(super) contact:Option<String>,
}

impl FieldArgs
{
	/// overwrites the draft's fields with those that were given
	pub(super) fn apply_to(self, draft:&mut RecordDraft)
	{
		if let Some(v) = self.name {draft.name = v;}
		if let Some(v) = self.birthday {draft.birthday = v;}
		if let Some(v) = self.address {draft.address = v;}
		if let Some(v) = self.age {draft.age = v;}
		if let Some(v) = self.gender {draft.gender = v;}
		if let Some(v) = self.contact {draft.contact_number = v;}
	}
}

#[derive(Subcommand)]
pub(crate) enum Commands {
	/// writing the default config out into the given file
	WriteConfig {
		file:PathBuf
	},
	/// run the reference record store
	Serve {
		/// ip and port to listen on (defaults to the config)
		address: Option<String>,
		/// json file with a list of records to start with
		#[arg(long, value_hint = FilePath)]
		seed: Option<PathBuf>,
	},
	/// show one page of records
	List {
		/// only records whose name contains this (ignoring case)
		#[arg(long, default_value = "")]
		search: String,
		/// field to sort by
		#[arg(long)]
		sort: Option<String>,
		/// sort descending
		#[arg(long, default_value_t = false)]
		desc: bool,
		#[arg(long, default_value_t = 1)]
		page: usize,
	},
	/// add a new record
	Add {
		#[command(flatten)]
		fields: FieldArgs,
	},
	/// change fields of an existing record
	Edit {
		id: RecordId,
		#[command(flatten)]
		fields: FieldArgs,
	},
	/// delete records (failed deletes are retried once)
	Delete {
		#[arg(required = true)]
		ids: Vec<RecordId>,
	},
	/// write all records into a spreadsheet (csv)
	Export {
		#[arg(value_hint = FilePath)]
		file: PathBuf,
	},
}


pub(super) fn parse() -> Cli
{
	let ret=Cli::parse();

	let filter = EnvFilter::builder()
		.with_default_directive(LevelFilter::from_level(ret.log_level.0).into())
		.from_env_lossy();
	tracing_subscriber::fmt().with_env_filter(filter).init();

	ret
}
