use serde::{Deserialize, Serialize};

use super::domain::TravelEntry;

/// Character limit applied to `purpose` unless configured otherwise.
pub const DEFAULT_PURPOSE_MAX_LEN: usize = 70;

/// Editable field of a travel entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    Date,
    OriginLocation,
    DestinationLocation,
    DepartureTime,
    ArrivalTime,
    Purpose,
}

impl EntryField {
    pub const fn ordered() -> [EntryField; 6] {
        [
            EntryField::Date,
            EntryField::OriginLocation,
            EntryField::DestinationLocation,
            EntryField::DepartureTime,
            EntryField::ArrivalTime,
            EntryField::Purpose,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            EntryField::Date => "date",
            EntryField::OriginLocation => "origin",
            EntryField::DestinationLocation => "destination",
            EntryField::DepartureTime => "departure time",
            EntryField::ArrivalTime => "arrival time",
            EntryField::Purpose => "purpose",
        }
    }
}

impl TravelEntry {
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Date => &self.date,
            EntryField::OriginLocation => &self.origin_location,
            EntryField::DestinationLocation => &self.destination_location,
            EntryField::DepartureTime => &self.departure_time,
            EntryField::ArrivalTime => &self.arrival_time,
            EntryField::Purpose => &self.purpose,
        }
    }

    fn field_mut(&mut self, field: EntryField) -> &mut String {
        match field {
            EntryField::Date => &mut self.date,
            EntryField::OriginLocation => &mut self.origin_location,
            EntryField::DestinationLocation => &mut self.destination_location,
            EntryField::DepartureTime => &mut self.departure_time,
            EntryField::ArrivalTime => &mut self.arrival_time,
            EntryField::Purpose => &mut self.purpose,
        }
    }
}

/// Errors raised before anything is sent to the collaborator API.
/// Entry numbers are 1-based, as shown to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("travel log must contain at least one entry")]
    EmptyLog,
    #[error("entry {entry} is missing its {}", .field.label())]
    MissingField { entry: usize, field: EntryField },
    #[error("entry {entry} purpose exceeds {max} characters (found {found})")]
    PurposeTooLong {
        entry: usize,
        max: usize,
        found: usize,
    },
    #[error("entry {0} does not exist")]
    UnknownEntry(usize),
    #[error("a travel log must keep at least one entry")]
    LastEntry,
    #[error("rejecting a report requires remarks")]
    MissingRejectionRemarks,
    #[error("attachment report is missing its {0}")]
    IncompleteAttachment(&'static str),
}

/// Check every entry has all six fields and a purpose within `purpose_max_len`.
pub fn validate_entries(
    entries: &[TravelEntry],
    purpose_max_len: usize,
) -> Result<(), ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::EmptyLog);
    }

    for (index, entry) in entries.iter().enumerate() {
        let number = index + 1;
        if let Some(field) = EntryField::ordered()
            .into_iter()
            .find(|field| entry.field(*field).trim().is_empty())
        {
            return Err(ValidationError::MissingField {
                entry: number,
                field,
            });
        }

        let found = entry.purpose.chars().count();
        if found > purpose_max_len {
            return Err(ValidationError::PurposeTooLong {
                entry: number,
                max: purpose_max_len,
                found,
            });
        }
    }

    Ok(())
}

/// Travel log being authored: always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelLogDraft {
    entries: Vec<TravelEntry>,
    purpose_max_len: usize,
}

impl Default for TravelLogDraft {
    fn default() -> Self {
        Self::new(DEFAULT_PURPOSE_MAX_LEN)
    }
}

impl TravelLogDraft {
    pub fn new(purpose_max_len: usize) -> Self {
        Self {
            entries: vec![TravelEntry::default()],
            purpose_max_len,
        }
    }

    /// Seed a draft from existing rows, e.g. a CSV import. An empty list becomes one blank entry.
    pub fn from_entries(entries: Vec<TravelEntry>, purpose_max_len: usize) -> Self {
        if entries.is_empty() {
            return Self::new(purpose_max_len);
        }
        Self {
            entries,
            purpose_max_len,
        }
    }

    pub fn entries(&self) -> &[TravelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn purpose_max_len(&self) -> usize {
        self.purpose_max_len
    }

    /// Append a blank entry and return its index.
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(TravelEntry::default());
        self.entries.len() - 1
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<TravelEntry, ValidationError> {
        if index >= self.entries.len() {
            return Err(ValidationError::UnknownEntry(index + 1));
        }
        if self.entries.len() == 1 {
            return Err(ValidationError::LastEntry);
        }
        Ok(self.entries.remove(index))
    }

    /// Overwrite one field. A purpose longer than the limit is refused and the old value kept.
    pub fn update(
        &mut self,
        index: usize,
        field: EntryField,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let max = self.purpose_max_len;
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(ValidationError::UnknownEntry(index + 1))?;
        let value = value.into();

        if field == EntryField::Purpose {
            let found = value.chars().count();
            if found > max {
                return Err(ValidationError::PurposeTooLong {
                    entry: index + 1,
                    max,
                    found,
                });
            }
        }

        *entry.field_mut(field) = value;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_entries(&self.entries, self.purpose_max_len)
    }

    /// Validate and hand back the entries for submission.
    pub fn into_entries(self) -> Result<Vec<TravelEntry>, ValidationError> {
        self.validate()?;
        Ok(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> TravelLogDraft {
        let mut draft = TravelLogDraft::default();
        for (field, value) in [
            (EntryField::Date, "2025-03-14"),
            (EntryField::OriginLocation, "Main Office"),
            (EntryField::DestinationLocation, "North Depot"),
            (EntryField::DepartureTime, "08:00"),
            (EntryField::ArrivalTime, "17:00"),
            (EntryField::Purpose, "Quarterly inventory audit"),
        ] {
            draft.update(0, field, value).expect("field accepted");
        }
        draft
    }

    #[test]
    fn new_draft_starts_with_one_blank_entry() {
        let draft = TravelLogDraft::default();
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.entries()[0], TravelEntry::default());
    }

    #[test]
    fn cannot_remove_the_last_entry() {
        let mut draft = TravelLogDraft::default();
        assert_eq!(draft.remove_entry(0), Err(ValidationError::LastEntry));

        let index = draft.add_entry();
        assert_eq!(index, 1);
        draft.remove_entry(0).expect("two entries allow removal");
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.remove_entry(3), Err(ValidationError::UnknownEntry(4)));
    }

    #[test]
    fn overlong_purpose_is_refused_at_input() {
        let mut draft = filled_draft();
        let long = "x".repeat(DEFAULT_PURPOSE_MAX_LEN + 1);
        let error = draft
            .update(0, EntryField::Purpose, long)
            .expect_err("purpose too long");
        assert_eq!(
            error,
            ValidationError::PurposeTooLong {
                entry: 1,
                max: DEFAULT_PURPOSE_MAX_LEN,
                found: DEFAULT_PURPOSE_MAX_LEN + 1,
            }
        );
        assert_eq!(draft.entries()[0].purpose, "Quarterly inventory audit");

        let exact = "y".repeat(DEFAULT_PURPOSE_MAX_LEN);
        draft
            .update(0, EntryField::Purpose, exact)
            .expect("limit is inclusive");
    }

    #[test]
    fn purpose_limit_counts_characters_not_bytes() {
        let mut draft = TravelLogDraft::new(5);
        draft
            .update(0, EntryField::Purpose, "ñandú")
            .expect("five characters fit");
    }

    #[test]
    fn validation_reports_first_missing_field() {
        let mut draft = filled_draft();
        draft.add_entry();
        draft
            .update(1, EntryField::Date, "2025-03-15")
            .expect("date accepted");

        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField {
                entry: 2,
                field: EntryField::OriginLocation,
            })
        );
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let mut draft = filled_draft();
        draft
            .update(0, EntryField::ArrivalTime, "   ")
            .expect("update accepted");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::MissingField {
                field: EntryField::ArrivalTime,
                ..
            })
        ));
    }

    #[test]
    fn imported_entries_are_rechecked_for_purpose_length() {
        let mut entry = filled_draft().entries()[0].clone();
        entry.purpose = "z".repeat(80);
        let draft = TravelLogDraft::from_entries(vec![entry], DEFAULT_PURPOSE_MAX_LEN);
        assert!(matches!(
            draft.into_entries(),
            Err(ValidationError::PurposeTooLong { found: 80, .. })
        ));
    }

    #[test]
    fn complete_draft_yields_entries() {
        let entries = filled_draft().into_entries().expect("valid draft");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].elapsed_hours(), 9);
    }

    #[test]
    fn empty_slice_is_rejected() {
        assert_eq!(
            validate_entries(&[], DEFAULT_PURPOSE_MAX_LEN),
            Err(ValidationError::EmptyLog)
        );
    }
}
