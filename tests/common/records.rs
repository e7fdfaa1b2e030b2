use chrono::NaiveDate;
use recordesk::{Gender, Record, RecordFields, RecordId};

pub fn date(y:i32, m:u32, d:u32) -> NaiveDate
{
	NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn fields(name:&str, age:u32) -> RecordFields
{
	RecordFields{
		name:name.to_string(),
		birthday:date(2025 - age as i32, 1, 1),
		address:format!("{age} Main Street"),
		age,
		gender:Gender::Unspecified,
		contact_number:format!("555-{age:04}"),
	}
}

pub fn record(id:RecordId, name:&str, age:u32) -> Record
{
	Record::new(id, fields(name, age), date(2025, 1, 1))
}

/// Ann (30), ann marie (25), Bob (40)
pub fn ann_and_bob() -> Vec<Record>
{
	vec![
		record(1, "Ann", 30),
		record(2, "ann marie", 25),
		record(3, "Bob", 40),
	]
}

const NAMES:[&str;8] = ["Ann", "ANNA", "Bob", "bobby", "Carla", "dan", "Eve", "Ann-Marie"];

/// `count` records with random names from a small pool, so there are plenty of ties
pub fn synthesize(count:usize) -> Vec<Record>
{
	(1..=count as RecordId)
		.map(|id| {
			let name = NAMES[rand::random_range(0..NAMES.len())];
			record(id, name, rand::random_range(18..90))
		})
		.collect()
}
