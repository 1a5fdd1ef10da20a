use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::TravelEntry;

#[derive(Debug, thiserror::Error)]
pub enum EntryImportError {
    #[error("failed to read travel log export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid travel log CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Read travel entries from a CSV export with a `Date,From,To,Departure,Arrival,Purpose` header.
/// Rows that are blank in every column are skipped; validation is left to the draft.
pub fn entries_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<TravelEntry>, EntryImportError> {
    let file = std::fs::File::open(path)?;
    entries_from_reader(file)
}

pub fn entries_from_reader<R: Read>(reader: R) -> Result<Vec<TravelEntry>, EntryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for row in csv_reader.deserialize::<EntryRow>() {
        let entry = row?.into_entry();
        if entry != TravelEntry::default() {
            entries.push(entry);
        }
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct EntryRow {
    #[serde(rename = "Date", default, deserialize_with = "blank_as_empty")]
    date: String,
    #[serde(rename = "From", default, deserialize_with = "blank_as_empty")]
    from: String,
    #[serde(rename = "To", default, deserialize_with = "blank_as_empty")]
    to: String,
    #[serde(rename = "Departure", default, deserialize_with = "blank_as_empty")]
    departure: String,
    #[serde(rename = "Arrival", default, deserialize_with = "blank_as_empty")]
    arrival: String,
    #[serde(rename = "Purpose", default, deserialize_with = "blank_as_empty")]
    purpose: String,
}

impl EntryRow {
    fn into_entry(self) -> TravelEntry {
        TravelEntry {
            date: self.date,
            origin_location: self.from,
            destination_location: self.to,
            departure_time: self.departure,
            arrival_time: self.arrival,
            purpose: self.purpose,
        }
    }
}

fn blank_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(|value| value.trim().to_string()).unwrap_or_default())
}
