use serde::{Deserialize, Serialize};

/// Export column headers, in the fixed order every table uses.
pub const COLUMNS: [&str; 8] = [
    "Name",
    "Email",
    "Phone",
    "Education",
    "Skills",
    "Experience",
    "Position",
    "Filename",
];

/// Structured output for one resume. Every field except `source_filename` is optional;
/// a record with nothing but a filename signals a failed or partial extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub position: Option<String>,
    pub source_filename: String,
}

impl CandidateRecord {
    pub fn empty(source_filename: impl Into<String>) -> Self {
        Self {
            source_filename: source_filename.into(),
            ..Default::default()
        }
    }

    /// Cells in `COLUMNS` order. Absent values are empty strings.
    pub fn cells(&self) -> [&str; 8] {
        [
            self.name.as_deref().unwrap_or(""),
            self.email.as_deref().unwrap_or(""),
            self.phone.as_deref().unwrap_or(""),
            self.education.as_deref().unwrap_or(""),
            self.skills.as_deref().unwrap_or(""),
            self.experience.as_deref().unwrap_or(""),
            self.position.as_deref().unwrap_or(""),
            &self.source_filename,
        ]
    }

    /// Inverse of `cells`: empty cells become `None`.
    #[cfg(test)]
    pub fn from_cells(cells: [&str; 8]) -> Self {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            name: opt(cells[0]),
            email: opt(cells[1]),
            phone: opt(cells[2]),
            education: opt(cells[3]),
            skills: opt(cells[4]),
            experience: opt(cells[5]),
            position: opt(cells[6]),
            source_filename: cells[7].to_string(),
        }
    }

    /// True when nothing but the filename was recovered.
    pub fn is_blank(&self) -> bool {
        self.cells()[..7].iter().all(|c| c.is_empty())
    }
}
