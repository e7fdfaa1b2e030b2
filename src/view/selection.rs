use std::collections::BTreeSet;
use crate::record::RecordId;

/// Ids picked for bulk actions.
#[derive(Debug,Clone,Default,PartialEq,Eq)]
pub struct Selection(BTreeSet<RecordId>);

impl Selection
{
	pub fn contains(&self, id:RecordId) -> bool {self.0.contains(&id)}
	pub fn len(&self) -> usize {self.0.len()}
	pub fn is_empty(&self) -> bool {self.0.is_empty()}
	pub fn ids(&self) -> Vec<RecordId> {self.0.iter().copied().collect()}

	/// returns whether `id` is selected afterwards
	pub fn toggle(&mut self, id:RecordId) -> bool
	{
		if self.0.remove(&id) {false}
		else {self.0.insert(id)}
	}

	/// Deselects `visible` if all of it is selected already, selects all of it otherwise.
	///
	/// Ids not in `visible` are left alone. An empty `visible` changes nothing.
	pub fn toggle_all(&mut self, visible:&[RecordId])
	{
		if visible.iter().all(|id|self.0.contains(id)) {
			for id in visible {self.0.remove(id);}
		} else {
			self.0.extend(visible.iter().copied());
		}
	}

	pub fn remove_all<I>(&mut self, ids:I) where I:IntoIterator<Item=RecordId>
	{
		for id in ids {self.0.remove(&id);}
	}

	pub fn clear(&mut self) {self.0.clear()}
}

impl FromIterator<RecordId> for Selection
{
	fn from_iter<T: IntoIterator<Item=RecordId>>(iter: T) -> Self {
		Selection(iter.into_iter().collect())
	}
}
