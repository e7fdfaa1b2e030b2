use crate::record::{Record, RecordField};
use super::SortDirection;

/// Everything the derived view depends on besides the records themselves.
#[derive(Debug,Clone,Copy)]
pub struct ViewQuery<'a>
{
	pub search:&'a str,
	pub sort_field:RecordField,
	pub sort_direction:SortDirection,
	/// requested page, 1-based, clamped when deriving
	pub page:usize,
	pub page_size:usize,
}

/// What a table renders: one page of the filtered and sorted records.
#[derive(Debug,Clone,PartialEq)]
pub struct ViewPage<'a>
{
	pub rows:Vec<&'a Record>,
	/// the page actually shown, after clamping
	pub page:usize,
	pub total_pages:usize,
	/// records matching the search, over all pages
	pub total_matches:usize,
}

impl ViewPage<'_>
{
	pub fn ids(&self) -> Vec<crate::record::RecordId>
	{
		self.rows.iter().map(|r|r.id).collect()
	}
	pub fn has_next(&self) -> bool {self.page < self.total_pages}
	pub fn has_previous(&self) -> bool {self.page > 1}
}

/// records whose name contains `search`, ignoring case, in their original order
pub fn filter<'a>(records:&'a [Record], search:&str) -> Vec<&'a Record>
{
	if search.is_empty() {
		return records.iter().collect();
	}
	let needle = search.to_lowercase();
	records.iter()
		.filter(|r|r.name.to_lowercase().contains(needle.as_str()))
		.collect()
}

/// Stable sort, so rows with equal keys keep their relative order in both directions.
pub fn sort(rows:&mut Vec<&Record>, field:RecordField, direction:SortDirection)
{
	let mut keyed:Vec<_> = rows.drain(..).map(|r|(field.sort_key(r),r)).collect();
	keyed.sort_by(|(a,_),(b,_)|direction.apply(a.cmp(b)));
	rows.extend(keyed.into_iter().map(|(_,r)|r));
}

pub fn total_pages(matches:usize, page_size:usize) -> usize
{
	matches.div_ceil(page_size.max(1)).max(1)
}

/// clamps `page` into `1..=total_pages` and cuts that page out of `rows`
pub fn paginate<'a>(rows:Vec<&'a Record>, page:usize, page_size:usize) -> ViewPage<'a>
{
	let page_size = page_size.max(1);
	let total_matches = rows.len();
	let total_pages = total_pages(total_matches,page_size);
	let page = page.clamp(1,total_pages);
	let rows = rows.into_iter()
		.skip((page-1)*page_size)
		.take(page_size)
		.collect();
	ViewPage{rows,page,total_pages,total_matches}
}

/// filter, sort and paginate in one go, never touching `records`
pub fn derive_view<'a>(records:&'a [Record], query:&ViewQuery) -> ViewPage<'a>
{
	let mut rows = filter(records,query.search);
	sort(&mut rows,query.sort_field,query.sort_direction);
	paginate(rows,query.page,query.page_size)
}
