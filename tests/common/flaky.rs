use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use recordesk::server::MemoryStore;
use recordesk::{Error, Record, RecordFields, RecordId, RecordStore, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ListFailure
{
	Unreachable,
	Garbage,
}

/// A [MemoryStore] that fails on demand.
#[derive(Default)]
pub struct FlakyStore
{
	pub inner:MemoryStore,
	/// how many more times deleting that id fails
	delete_failures:RefCell<BTreeMap<RecordId, u32>>,
	list_failure:Cell<Option<ListFailure>>,
	/// the next listing is answered only after yielding this often
	list_delay:Cell<u32>,
	fail_writes:Cell<bool>,
	pub delete_calls:Cell<usize>,
	pub create_calls:Cell<usize>,
}

impl FlakyStore
{
	pub fn with_records(records:Vec<Record>) -> FlakyStore
	{
		FlakyStore{inner:MemoryStore::with_records(records), ..Default::default()}
	}
	pub fn fail_delete(&self, id:RecordId, times:u32)
	{
		self.delete_failures.borrow_mut().insert(id, times);
	}
	pub fn fail_list(&self, failure:Option<ListFailure>)
	{
		self.list_failure.set(failure);
	}
	pub fn delay_next_list(&self, yields:u32)
	{
		self.list_delay.set(yields);
	}
	pub fn fail_writes(&self, fail:bool)
	{
		self.fail_writes.set(fail);
	}
	fn server_error(what:&str) -> Error
	{
		Error::Server {status:500, message:format!("Failed to {what}")}
	}
}

impl RecordStore for FlakyStore
{
	async fn list(&self) -> Result<Vec<Record>>
	{
		// the answer is taken right away, a delay only holds it back
		let answer = match self.list_failure.get() {
			Some(ListFailure::Unreachable) => Err(Self::server_error("fetch records")),
			Some(ListFailure::Garbage) => Err(Error::ResponseShape("expected a list".into())),
			None => self.inner.list().await
		};
		for _ in 0..self.list_delay.take() {
			tokio::task::yield_now().await;
		}
		answer
	}

	async fn create(&self, fields:&RecordFields) -> Result<Record>
	{
		self.create_calls.set(self.create_calls.get() + 1);
		// lets a concurrently polled operation run while this one is "on the wire"
		tokio::task::yield_now().await;
		if self.fail_writes.get() {
			return Err(Self::server_error("add record"));
		}
		self.inner.create(fields).await
	}

	async fn update(&self, id:RecordId, fields:&RecordFields) -> Result<Record>
	{
		tokio::task::yield_now().await;
		if self.fail_writes.get() {
			return Err(Self::server_error("update record"));
		}
		self.inner.update(id, fields).await
	}

	async fn delete(&self, id:RecordId) -> Result<()>
	{
		self.delete_calls.set(self.delete_calls.get() + 1);
		let failing = {
			let mut failures = self.delete_failures.borrow_mut();
			match failures.get_mut(&id) {
				Some(remaining) if *remaining > 0 => {
					*remaining -= 1;
					true
				}
				_ => false
			}
		};
		if failing || self.fail_writes.get() {
			return Err(Self::server_error("delete record"));
		}
		self.inner.delete(id).await
	}
}
