use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::client::RecordStore;
use crate::record::{Record, RecordFields, RecordId};
use crate::tools::{Error, Result};
use crate::view;

#[derive(Default)]
struct Table
{
	last_id:RecordId,
	rows:BTreeMap<RecordId,Record>,
}

/// In-memory records table behind the reference server.
///
/// Ids are handed out from a counter that never goes back, so a deleted id is never reused.
#[derive(Clone,Default)]
pub struct MemoryStore
{
	table:Arc<RwLock<Table>>,
}

impl MemoryStore
{
	pub fn new() -> MemoryStore {MemoryStore::default()}

	/// starts with the given records, new ids continue after the highest one
	pub fn with_records<I>(records:I) -> MemoryStore where I:IntoIterator<Item=Record>
	{
		let rows:BTreeMap<_,_> = records.into_iter().map(|r|(r.id,r)).collect();
		let last_id = rows.keys().next_back().copied().unwrap_or(0);
		MemoryStore{table:Arc::new(RwLock::new(Table{last_id,rows}))}
	}

	pub async fn insert(&self, fields:RecordFields) -> Record
	{
		let mut table = self.table.write().await;
		table.last_id += 1;
		let record = Record::new(table.last_id,fields,Utc::now().date_naive());
		table.rows.insert(record.id,record.clone());
		tracing::debug!("created record {}",record.id);
		record
	}

	/// all records in ascending id order
	pub async fn all(&self) -> Vec<Record>
	{
		self.table.read().await.rows.values().cloned().collect()
	}

	/// records whose name contains `search` (ignoring case), newest first
	pub async fn search(&self, search:&str) -> Vec<Record>
	{
		let table = self.table.read().await;
		let rows:Vec<_> = table.rows.values().rev().cloned().collect();
		view::filter(&rows,search).into_iter().cloned().collect()
	}

	pub async fn get(&self, id:RecordId) -> Option<Record>
	{
		self.table.read().await.rows.get(&id).cloned()
	}

	/// replaces the editable fields, id and creation date stay untouched
	pub async fn replace(&self, id:RecordId, fields:RecordFields) -> Result<Record>
	{
		let mut table = self.table.write().await;
		let row = table.rows.get_mut(&id).ok_or(Error::NotFound {id})?;
		*row = row.replaced(fields);
		tracing::debug!("updated record {id}");
		Ok(row.clone())
	}

	pub async fn remove(&self, id:RecordId) -> Result<Record>
	{
		let removed = self.table.write().await.rows.remove(&id).ok_or(Error::NotFound {id})?;
		tracing::debug!("deleted record {id}");
		Ok(removed)
	}

	pub async fn len(&self) -> usize
	{
		self.table.read().await.rows.len()
	}

	pub async fn is_empty(&self) -> bool
	{
		self.len().await == 0
	}
}

/// Lets a [Dashboard](crate::view::Dashboard) run directly on the table, without http in between.
impl RecordStore for MemoryStore
{
	async fn list(&self) -> Result<Vec<Record>> {Ok(self.all().await)}

	async fn create(&self, fields:&RecordFields) -> Result<Record>
	{
		Ok(self.insert(fields.clone()).await)
	}

	async fn update(&self, id:RecordId, fields:&RecordFields) -> Result<Record>
	{
		self.replace(id,fields.clone()).await
	}

	async fn delete(&self, id:RecordId) -> Result<()>
	{
		self.remove(id).await.map(|_|())
	}
}
