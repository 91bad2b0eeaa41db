use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::domain::{NationalId, VerificationStatus};

/// Boundary to the member roster used for identity verification and email
/// resolution. Lookups distinguish members already on file from
/// self-registrations awaiting staff confirmation.
pub trait IdentityDirectory: Send + Sync {
    fn lookup(&self, id: &NationalId) -> Result<VerificationStatus, DirectoryError>;

    /// Record an unknown id as awaiting confirmation. Re-registering an
    /// unconfirmed id refreshes its timestamp; a confirmed id is left alone.
    fn register_pending(&self, id: &NationalId) -> Result<(), DirectoryError>;

    /// Promote a pending registration to verified.
    fn confirm_registration(&self, id: &NationalId) -> Result<(), DirectoryError>;

    /// Email on file for a rostered member, if any.
    fn email_for(&self, id: &NationalId) -> Result<Option<String>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("no registration on file for this id")]
    NotRegistered,
    #[error("roster could not be read")]
    Csv(#[from] csv::Error),
    #[error("roster row {row} carries an invalid id: {detail}")]
    InvalidRow { row: usize, detail: String },
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}

/// Rostered member as exported from the administrative spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: NationalId,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    confirmed: bool,
    updated_at: DateTime<Utc>,
}

/// Directory backed by a CSV export of the member spreadsheet, plus an
/// in-process book of self-registrations.
#[derive(Debug)]
pub struct CsvRoster {
    members: HashMap<NationalId, MemberRecord>,
    registrations: Mutex<HashMap<NationalId, Registration>>,
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "National Id")]
    national_id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
}

impl CsvRoster {
    /// Roster with no members on file. Ids can still self-register and be
    /// confirmed in-process.
    pub fn empty() -> Self {
        Self {
            members: HashMap::new(),
            registrations: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut members = HashMap::new();
        for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row = record?;
            let id = NationalId::parse(&row.national_id).map_err(|err| {
                DirectoryError::InvalidRow {
                    row: index + 1,
                    detail: err.to_string(),
                }
            })?;
            members.insert(
                id.clone(),
                MemberRecord {
                    id,
                    name: row.name,
                    email: row.email,
                },
            );
        }

        Ok(Self {
            members,
            registrations: Mutex::new(HashMap::new()),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let file = std::fs::File::open(path)
            .map_err(|err| DirectoryError::Unavailable(err.to_string()))?;
        Self::from_reader(file)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Unconfirmed registrations with the time they were last touched,
    /// oldest first, for staff review.
    pub fn pending_registrations(&self) -> Result<Vec<(NationalId, DateTime<Utc>)>, DirectoryError> {
        let registrations = self
            .registrations
            .lock()
            .map_err(|_| DirectoryError::Unavailable("registration book poisoned".to_string()))?;

        let mut pending: Vec<(NationalId, DateTime<Utc>)> = registrations
            .iter()
            .filter(|(_, registration)| !registration.confirmed)
            .map(|(id, registration)| (id.clone(), registration.updated_at))
            .collect();
        pending.sort_by_key(|(_, updated_at)| *updated_at);
        Ok(pending)
    }
}

impl IdentityDirectory for CsvRoster {
    fn lookup(&self, id: &NationalId) -> Result<VerificationStatus, DirectoryError> {
        if self.members.contains_key(id) {
            return Ok(VerificationStatus::Verified);
        }

        let registrations = self
            .registrations
            .lock()
            .map_err(|_| DirectoryError::Unavailable("registration book poisoned".to_string()))?;
        match registrations.get(id) {
            Some(registration) if registration.confirmed => Ok(VerificationStatus::Verified),
            Some(_) => Ok(VerificationStatus::Pending),
            None => Ok(VerificationStatus::Unknown),
        }
    }

    fn register_pending(&self, id: &NationalId) -> Result<(), DirectoryError> {
        let mut registrations = self
            .registrations
            .lock()
            .map_err(|_| DirectoryError::Unavailable("registration book poisoned".to_string()))?;

        let entry = registrations.entry(id.clone()).or_insert(Registration {
            confirmed: false,
            updated_at: Utc::now(),
        });
        if !entry.confirmed {
            entry.updated_at = Utc::now();
        }
        Ok(())
    }

    fn confirm_registration(&self, id: &NationalId) -> Result<(), DirectoryError> {
        let mut registrations = self
            .registrations
            .lock()
            .map_err(|_| DirectoryError::Unavailable("registration book poisoned".to_string()))?;

        match registrations.get_mut(id) {
            Some(registration) => {
                registration.confirmed = true;
                registration.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DirectoryError::NotRegistered),
        }
    }

    fn email_for(&self, id: &NationalId) -> Result<Option<String>, DirectoryError> {
        Ok(self
            .members
            .get(id)
            .and_then(|member| member.email.clone()))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
