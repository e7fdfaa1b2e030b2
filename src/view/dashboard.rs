use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;
use futures::future::join_all;
use tracing;
use crate::client::RecordStore;
use crate::config::ViewConfig;
use crate::record::{Record, RecordDraft, RecordFields, RecordId};
use crate::tools::{export, Error, Result};
use super::RecordView;

#[derive(Debug,Clone,PartialEq)]
pub enum Mutation
{
	Create(RecordFields),
	/// replaces all editable fields of the record with that id
	Update(RecordId,RecordFields),
	Delete(RecordId),
}

impl Mutation
{
	pub fn replace(record:&Record) -> Mutation
	{
		Mutation::Update(record.id,record.fields())
	}
}

impl Display for Mutation
{
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Mutation::Create(fields) => write!(f,"creating record for {}",fields.name),
			Mutation::Update(id,_) => write!(f,"updating record {id}"),
			Mutation::Delete(id) => write!(f,"deleting record {id}"),
		}
	}
}

/// Outcome of [Dashboard::bulk_delete].
#[derive(Debug,Default)]
pub struct BulkDeleteReport
{
	pub deleted:Vec<RecordId>,
	/// ids that failed twice, they stay selected
	pub failed:Vec<(RecordId,Error)>,
	/// set if re-fetching the records afterwards failed
	pub refresh_error:Option<Error>,
}

impl BulkDeleteReport
{
	pub fn is_complete(&self) -> bool
	{
		self.failed.is_empty() && self.refresh_error.is_none()
	}
}

/// Outcome of [Dashboard::apply] and [Dashboard::save].
///
/// The change itself went through. If re-fetching afterwards failed, the last snapshot stays
/// and the failure is in `refresh_error`, so the change must not be resubmitted.
#[derive(Debug)]
pub struct Applied<R>
{
	/// what the store answered with
	pub record:R,
	pub refresh_error:Option<Error>,
}

impl<R> Applied<R>
{
	pub fn is_complete(&self) -> bool {self.refresh_error.is_none()}
}

/// Clears the in-flight flag when the mutation is done, or its future got dropped.
struct MutationGuard<'a>(&'a Cell<bool>);

impl Drop for MutationGuard<'_>
{
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// The view state bound to a record store.
///
/// Meant to live on a single UI task. All methods take `&self`, so operations may interleave
/// at their await points, but only one mutation can be in flight at a time.
pub struct Dashboard<S>
{
	store:S,
	view:RefCell<RecordView>,
	in_flight:Cell<bool>,
	/// number of the latest refresh that was started
	refresh_started:Cell<u64>,
	/// number of the refresh whose answer is shown
	refresh_shown:Cell<u64>,
}

impl<S> Dashboard<S> where S:RecordStore
{
	pub fn new(store:S, config:&ViewConfig) -> Dashboard<S>
	{
		Dashboard{
			store,
			view:RefCell::new(RecordView::new(config)),
			in_flight:Cell::new(false),
			refresh_started:Cell::new(0),
			refresh_shown:Cell::new(0),
		}
	}

	pub fn store(&self) -> &S {&self.store}

	pub fn view(&self) -> Ref<'_,RecordView> {self.view.borrow()}

	/// For the synchronous intents (search, sort, paging, selection).
	/// Don't hold on to it across an await.
	pub fn view_mut(&self) -> RefMut<'_,RecordView> {self.view.borrow_mut()}

	pub fn is_busy(&self) -> bool {self.in_flight.get()}

	fn begin_mutation(&self) -> Result<MutationGuard<'_>>
	{
		if self.in_flight.replace(true) {
			tracing::warn!("rejecting change while another one is still being submitted");
			return Err(Error::MutationInProgress);
		}
		Ok(MutationGuard(&self.in_flight))
	}

	/// Re-fetches the complete snapshot.
	///
	/// If the store can't be reached the previous snapshot stays. If it answers with something
	/// that isn't a record list the snapshot is emptied. Either way the error is returned.
	/// An answer that arrives after the answer of a later refresh is dropped.
	pub async fn refresh(&self) -> Result<usize>
	{
		let generation = self.refresh_started.get() + 1;
		self.refresh_started.set(generation);
		let listed = self.store.list().await;
		if generation < self.refresh_shown.get() {
			tracing::debug!("dropping the answer of refresh {generation}, refresh {} is newer",self.refresh_shown.get());
			return listed.map(|_|self.view.borrow().records().len());
		}
		match listed {
			Ok(records) => {
				let count = records.len();
				self.show(generation,records);
				tracing::debug!("loaded {count} records");
				Ok(count)
			}
			Err(e) => {
				if let Error::ResponseShape(_) = e.root_cause() {
					tracing::warn!("unreadable record list, showing none ({e})");
					self.show(generation,Vec::new());
				} else {
					tracing::warn!("refreshing records failed, keeping the last snapshot ({e})");
				}
				Err(e)
			}
		}
	}

	fn show(&self, generation:u64, records:Vec<Record>)
	{
		self.refresh_shown.set(generation);
		self.view.borrow_mut().replace_records(records);
	}

	/// Sends one change to the store, then re-fetches everything.
	///
	/// The record is the one the store answered with (none for deletes).
	/// A failed change leaves the snapshot alone and is returned as error.
	pub async fn apply(&self, mutation:Mutation) -> Result<Applied<Option<Record>>>
	{
		let _guard = self.begin_mutation()?;
		let ctx = mutation.to_string();
		let result = match &mutation {
			Mutation::Create(fields) => self.store.create(fields).await.map(Some),
			Mutation::Update(id,fields) => self.store.update(*id,fields).await.map(Some),
			Mutation::Delete(id) => self.store.delete(*id).await.map(|_|None),
		};
		let record = result.inspect_err(|e|tracing::error!("{ctx} failed: {e}"))?;
		if let Mutation::Delete(id) = mutation {
			self.view.borrow_mut().deselect([id]);
		}
		let refresh_error = self.refresh().await.err()
			.map(|e|e.context(format!("refreshing after {ctx}")));
		Ok(Applied{record,refresh_error})
	}

	/// The edit form's save: creates a record for drafts without id, replaces the record otherwise.
	pub async fn save(&self, draft:&RecordDraft) -> Result<Applied<Record>>
	{
		let fields = draft.validate()?;
		let mutation = match draft.id {
			Some(id) => Mutation::Update(id,fields),
			None => Mutation::Create(fields)
		};
		let Applied{record,refresh_error} = self.apply(mutation).await?;
		let record = record.ok_or_else(||Error::ResponseShape("store answered without a record".into()))?;
		Ok(Applied{record,refresh_error})
	}

	/// Deletes every selected record.
	///
	/// All deletes are sent at once, failed ones are retried once.
	/// The snapshot is re-fetched afterwards no matter what.
	/// Deleted ids leave the selection, ids that still failed stay selected.
	pub async fn bulk_delete(&self) -> Result<BulkDeleteReport>
	{
		let _guard = self.begin_mutation()?;
		let ids = self.view.borrow().selection().ids();
		let mut report = BulkDeleteReport::default();
		if ids.is_empty() {
			return Ok(report);
		}

		let mut retry = Vec::new();
		let attempts = join_all(ids.iter().map(|id|self.store.delete(*id))).await;
		for (id,attempt) in ids.into_iter().zip(attempts) {
			match attempt {
				Ok(()) => report.deleted.push(id),
				Err(e) => {
					tracing::warn!("deleting record {id} failed, will retry ({e})");
					retry.push(id);
				}
			}
		}
		let retries = join_all(retry.iter().map(|id|self.store.delete(*id))).await;
		for (id,attempt) in retry.into_iter().zip(retries) {
			match attempt {
				Ok(()) => report.deleted.push(id),
				Err(e) => {
					tracing::error!("deleting record {id} failed again ({e})");
					report.failed.push((id,e));
				}
			}
		}

		self.view.borrow_mut().deselect(report.deleted.iter().copied());
		if let Err(e) = self.refresh().await {
			report.refresh_error = Some(e.context("refreshing after bulk delete"));
		}
		tracing::info!("bulk delete removed {} records, {} failed",report.deleted.len(),report.failed.len());
		Ok(report)
	}

	/// Writes the whole snapshot, regardless of search or page.
	pub fn export<W>(&self, writer:W) -> Result<usize> where W:Write
	{
		export::write_csv(self.view.borrow().records(),writer)
	}

	pub fn export_to_path<P>(&self, path:P) -> Result<usize> where P:AsRef<Path>
	{
		export::export_to_path(self.view.borrow().records(),path)
	}
}
