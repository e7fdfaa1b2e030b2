use std::io::Write;
use std::path::Path;
use crate::record::{Record, RecordField};
use crate::tools::{Context, Result};

pub const EXPORT_FILENAME:&str = "records.csv";
pub const EXPORT_MIME:&str = "text/csv";

/// Cells starting like a formula get a leading `'`, so spreadsheet programs show them as text.
fn defuse(cell:String) -> String
{
	match cell.chars().next() {
		Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
		_ => cell
	}
}

/// Writes `records` as a spreadsheet, one row per record, columns in [RecordField::ALL] order.
///
/// Returns the number of rows written (without the header).
pub fn write_csv<W>(records:&[Record], writer:W) -> Result<usize> where W:Write
{
	let mut csv = csv::Writer::from_writer(writer);
	csv.write_record(RecordField::ALL.iter().map(RecordField::wire_name))?;
	for record in records {
		csv.write_record(record.cells().into_iter().map(defuse))
			.context(format!("writing record {}",record.id))?;
	}
	csv.flush()?;
	Ok(records.len())
}

pub fn to_csv_bytes(records:&[Record]) -> Result<Vec<u8>>
{
	let mut buffer = Vec::new();
	write_csv(records,&mut buffer)?;
	Ok(buffer)
}

pub fn export_to_path<P>(records:&[Record], path:P) -> Result<usize> where P:AsRef<Path>
{
	let path = path.as_ref();
	let ctx = format!("exporting {} records to {}",records.len(),path.to_string_lossy());
	let file = std::fs::File::create(path).context(ctx.as_str())?;
	let written = write_csv(records,std::io::BufWriter::new(file)).context(ctx)?;
	tracing::info!("exported {written} records to {}",path.to_string_lossy());
	Ok(written)
}
