use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::tools::{Error, Result};

pub type RecordId = i64;

#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,Hash)]
pub enum Gender
{
	Male,
	Female,
	#[default]
	Unspecified
}

impl Gender
{
	pub fn as_str(&self) -> &'static str
	{
		match self {
			Gender::Male => "male",
			Gender::Female => "female",
			Gender::Unspecified => "unspecified"
		}
	}
}

impl Display for Gender
{
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// never fails, anything that isn't recognizable is [Gender::Unspecified]
impl FromStr for Gender
{
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(match s.trim().to_lowercase().as_str() {
			"male" | "m" => Gender::Male,
			"female" | "f" => Gender::Female,
			_ => Gender::Unspecified
		})
	}
}

impl Serialize for Gender
{
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Gender
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let text = Option::<String>::deserialize(deserializer)?;
		Ok(text.map_or(Gender::Unspecified,|t|t.parse().unwrap_or_default()))
	}
}

/// Dates go out as `YYYY-MM-DD`; full RFC 3339 timestamps are accepted on the way in.
pub(crate) mod wire_date
{
	use chrono::{DateTime, NaiveDate};
	use serde::{de, Deserialize, Deserializer, Serializer};

	const FORMAT:&str = "%Y-%m-%d";

	pub fn parse(text:&str) -> Result<NaiveDate, chrono::ParseError>
	{
		let text = text.trim();
		NaiveDate::parse_from_str(text, FORMAT)
			.or_else(|e|DateTime::parse_from_rfc3339(text).map(|d|d.date_naive()).map_err(|_|e))
	}

	pub fn format(date:&NaiveDate) -> String
	{
		date.format(FORMAT).to_string()
	}

	pub fn serialize<S: Serializer>(date:&NaiveDate, serializer:S) -> Result<S::Ok, S::Error>
	{
		serializer.collect_str(&date.format(FORMAT))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer:D) -> Result<NaiveDate, D::Error>
	{
		let text = String::deserialize(deserializer)?;
		parse(&text).map_err(|e|de::Error::custom(format!("invalid date '{text}': {e}")))
	}
}

/// One row of the records table, exactly as the store hands it out.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record
{
	pub id:RecordId,
	pub name:String,
	#[serde(with = "wire_date")]
	pub birthday:NaiveDate,
	#[serde(default)]
	pub address:String,
	pub age:u32,
	#[serde(default)]
	pub gender:Gender,
	#[serde(default)]
	pub contact_number:String,
	#[serde(with = "wire_date", alias = "dateToday")]
	pub created_date:NaiveDate,
}

/// The editable part of a [Record], body of create and update requests.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields
{
	pub name:String,
	#[serde(with = "wire_date")]
	pub birthday:NaiveDate,
	#[serde(default)]
	pub address:String,
	pub age:u32,
	#[serde(default)]
	pub gender:Gender,
	#[serde(default)]
	pub contact_number:String,
}

impl Record
{
	pub fn new(id:RecordId, fields:RecordFields, created_date:NaiveDate) -> Record
	{
		let RecordFields{name,birthday,address,age,gender,contact_number} = fields;
		Record{id,name,birthday,address,age,gender,contact_number,created_date}
	}
	pub fn fields(&self) -> RecordFields
	{
		RecordFields{
			name:self.name.clone(),
			birthday:self.birthday,
			address:self.address.clone(),
			age:self.age,
			gender:self.gender,
			contact_number:self.contact_number.clone(),
		}
	}
	/// a copy with all editable fields replaced, id and creation date stay
	pub fn replaced(&self, fields:RecordFields) -> Record
	{
		Record::new(self.id,fields,self.created_date)
	}
	/// string form of every field in [RecordField::ALL] order
	pub fn cells(&self) -> Vec<String>
	{
		RecordField::ALL.iter().map(|f|f.value(self)).collect()
	}
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum RecordField
{
	Id,
	Name,
	Birthday,
	Address,
	Age,
	Gender,
	ContactNumber,
	CreatedDate
}

impl RecordField
{
	pub const ALL:[RecordField;8] = [
		RecordField::Id,
		RecordField::Name,
		RecordField::Birthday,
		RecordField::Address,
		RecordField::Age,
		RecordField::Gender,
		RecordField::ContactNumber,
		RecordField::CreatedDate,
	];

	pub fn wire_name(&self) -> &'static str
	{
		match self {
			RecordField::Id => "id",
			RecordField::Name => "name",
			RecordField::Birthday => "birthday",
			RecordField::Address => "address",
			RecordField::Age => "age",
			RecordField::Gender => "gender",
			RecordField::ContactNumber => "contactNumber",
			RecordField::CreatedDate => "createdDate",
		}
	}

	pub fn value(&self, record:&Record) -> String
	{
		match self {
			RecordField::Id => record.id.to_string(),
			RecordField::Name => record.name.clone(),
			RecordField::Birthday => wire_date::format(&record.birthday),
			RecordField::Address => record.address.clone(),
			RecordField::Age => record.age.to_string(),
			RecordField::Gender => record.gender.to_string(),
			RecordField::ContactNumber => record.contact_number.clone(),
			RecordField::CreatedDate => wire_date::format(&record.created_date),
		}
	}

	/// Integer fields order numerically, everything else by its lower-cased string form.
	pub fn sort_key(&self, record:&Record) -> SortKey
	{
		match self {
			RecordField::Id => SortKey::Number(record.id),
			RecordField::Age => SortKey::Number(record.age.into()),
			_ => SortKey::Text(self.value(record).to_lowercase())
		}
	}

	pub fn compare(&self, a:&Record, b:&Record) -> Ordering
	{
		self.sort_key(a).cmp(&self.sort_key(b))
	}
}

#[derive(Clone,Debug,PartialEq,Eq,PartialOrd,Ord)]
pub enum SortKey
{
	Number(i64),
	Text(String)
}

impl Display for RecordField
{
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.wire_name())
	}
}

/// accepts the wire name as well as snake_case, ignoring case
impl FromStr for RecordField
{
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		let wanted = s.trim().replace('_',"").to_lowercase();
		RecordField::ALL.into_iter()
			.find(|f|f.wire_name().to_lowercase() == wanted)
			.ok_or_else(||Error::InvalidQuery(format!("unknown field '{s}'")))
	}
}

/// State of the edit form, everything as typed in.
///
/// A draft with an `id` is an edit of that record, without one it is a new record.
#[derive(Clone,Debug,Default,PartialEq)]
pub struct RecordDraft
{
	pub id:Option<RecordId>,
	pub name:String,
	pub birthday:String,
	pub address:String,
	pub age:String,
	pub gender:String,
	pub contact_number:String,
}

impl RecordDraft
{
	pub fn validate(&self) -> Result<RecordFields>
	{
		let name = self.name.trim();
		if name.is_empty() {
			return Err(Error::InvalidDraft("name must not be empty".into()));
		}
		let birthday = wire_date::parse(&self.birthday)
			.map_err(|e|Error::InvalidDraft(format!("birthday '{}' is not a date ({e})",self.birthday)))?;
		let age = self.age.trim().parse::<u32>()
			.map_err(|e|Error::InvalidDraft(format!("age '{}' is not a number ({e})",self.age)))?;
		Ok(RecordFields{
			name:name.to_string(),
			birthday,
			address:self.address.trim().to_string(),
			age,
			gender:self.gender.parse().unwrap_or_default(),
			contact_number:self.contact_number.trim().to_string(),
		})
	}
}

impl From<&Record> for RecordDraft
{
	fn from(record: &Record) -> Self
	{
		RecordDraft{
			id:Some(record.id),
			name:record.name.clone(),
			birthday:wire_date::format(&record.birthday),
			address:record.address.clone(),
			age:record.age.to_string(),
			gender:record.gender.to_string(),
			contact_number:record.contact_number.clone(),
		}
	}
}
