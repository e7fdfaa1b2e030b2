use serde::Deserialize;
use crate::record::Record;
use crate::tools::{Error, Result};

/// What `GET /records` answered: a bare list or an envelope with a total.
#[derive(Debug,Clone,PartialEq)]
pub struct ListReply
{
	pub records:Vec<Record>,
	/// number of matching records on the server, may exceed `records.len()` for paged requests
	pub total_count:usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireReply
{
	Bare(Vec<Record>),
	Envelope{
		#[serde(alias = "patients")]
		records:Vec<Record>,
		#[serde(rename = "totalCount", default)]
		total_count:Option<usize>
	}
}

impl ListReply
{
	pub fn parse(body:&[u8]) -> Result<ListReply>
	{
		let reply:WireReply = serde_json::from_slice(body)
			.map_err(|e|Error::ResponseShape(format!("expected a list of records or {{records, totalCount}}: {e}")))?;
		Ok(match reply {
			WireReply::Bare(records) => ListReply{total_count:records.len(),records},
			WireReply::Envelope {records,total_count} =>
				ListReply{total_count:total_count.unwrap_or(records.len()),records}
		})
	}
}
