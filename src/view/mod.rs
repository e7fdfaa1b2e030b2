//! The dashboard's view state: the record snapshot plus search, sort, page and selection.
//!
//! [RecordView] is plain state without any I/O, [Dashboard] drives it against a
//! [RecordStore](crate::client::RecordStore).

mod derive;
mod selection;
mod dashboard;

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::config::ViewConfig;
use crate::record::{Record, RecordField, RecordId};
use crate::tools::{Error, Result};

pub use derive::{derive_view, filter, paginate, sort, total_pages, ViewPage, ViewQuery};
pub use selection::Selection;
pub use dashboard::{Applied, BulkDeleteReport, Dashboard, Mutation};

#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub enum SortDirection
{
	#[default]
	Ascending,
	Descending
}

impl SortDirection
{
	pub fn flipped(self) -> SortDirection
	{
		match self {
			SortDirection::Ascending => SortDirection::Descending,
			SortDirection::Descending => SortDirection::Ascending
		}
	}
	pub fn apply(self, ordering:Ordering) -> Ordering
	{
		match self {
			SortDirection::Ascending => ordering,
			SortDirection::Descending => ordering.reverse()
		}
	}
}

impl Display for SortDirection
{
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SortDirection::Ascending => "asc",
			SortDirection::Descending => "desc"
		})
	}
}

impl FromStr for SortDirection
{
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_lowercase().as_str() {
			"asc" | "ascending" => Ok(SortDirection::Ascending),
			"desc" | "descending" => Ok(SortDirection::Descending),
			_ => Err(Error::InvalidQuery(format!("unknown sort direction '{s}'")))
		}
	}
}

#[derive(Debug,Clone)]
pub struct RecordView
{
	records:Vec<Record>,
	search:String,
	sort_field:RecordField,
	sort_direction:SortDirection,
	page:usize,
	page_size:usize,
	selection:Selection,
}

impl RecordView
{
	/// Empty view, newest records (highest id) first.
	pub fn new(config:&ViewConfig) -> RecordView
	{
		RecordView{
			records:Vec::new(),
			search:String::new(),
			sort_field:RecordField::Id,
			sort_direction:SortDirection::Descending,
			page:1,
			page_size:config.page_size.max(1),
			selection:Selection::default(),
		}
	}

	pub fn records(&self) -> &[Record] {&self.records}

	/// swaps in a new snapshot, the old one is dropped as a whole
	pub fn replace_records(&mut self, records:Vec<Record>)
	{
		self.records = records;
	}

	pub fn search(&self) -> &str {&self.search}

	pub fn set_search<T>(&mut self, text:T) where T:Into<String>
	{
		self.search = text.into();
		self.page = 1;
	}

	pub fn sort(&self) -> (RecordField, SortDirection) {(self.sort_field,self.sort_direction)}

	/// same field flips the direction, another field starts ascending
	pub fn toggle_sort(&mut self, field:RecordField)
	{
		if self.sort_field == field {
			self.sort_direction = self.sort_direction.flipped();
		} else {
			self.sort_field = field;
			self.sort_direction = SortDirection::Ascending;
		}
	}

	pub fn set_sort(&mut self, field:RecordField, direction:SortDirection)
	{
		self.sort_field = field;
		self.sort_direction = direction;
	}

	pub fn page_size(&self) -> usize {self.page_size}

	/// the requested page, which may lie beyond the last one
	pub fn requested_page(&self) -> usize {self.page}

	pub fn go_to_page(&mut self, page:usize)
	{
		self.page = page.max(1);
	}

	pub fn next_page(&mut self)
	{
		let (current,has_next) = {
			let page = self.derive();
			(page.page,page.has_next())
		};
		self.page = if has_next {current + 1} else {current};
	}

	pub fn previous_page(&mut self)
	{
		let current = self.derive().page;
		self.page = current.saturating_sub(1).max(1);
	}

	pub fn query(&self) -> ViewQuery<'_>
	{
		ViewQuery{
			search:&self.search,
			sort_field:self.sort_field,
			sort_direction:self.sort_direction,
			page:self.page,
			page_size:self.page_size,
		}
	}

	pub fn derive(&self) -> ViewPage<'_>
	{
		derive_view(&self.records,&self.query())
	}

	pub fn selection(&self) -> &Selection {&self.selection}

	pub fn toggle_selection(&mut self, id:RecordId) -> bool
	{
		self.selection.toggle(id)
	}

	/// selects or deselects exactly the rows of the current page
	pub fn toggle_select_all_visible(&mut self)
	{
		let visible = self.derive().ids();
		self.selection.toggle_all(&visible);
	}

	pub fn clear_selection(&mut self)
	{
		self.selection.clear();
	}

	pub(crate) fn deselect<I>(&mut self, ids:I) where I:IntoIterator<Item=RecordId>
	{
		self.selection.remove_all(ids);
	}
}
