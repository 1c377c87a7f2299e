use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Structured resume fields as returned by the resume extractor.
/// Every field is optional; a missing field is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub skills: Option<BTreeSet<String>>,
    #[serde(default)]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(default)]
    pub education: Option<Vec<EducationEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default, alias = "university")]
    pub institution: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl ResumeRecord {
    /// Fills `name` from the source filename when the extractor found none.
    /// A blank name counts as missing.
    pub fn backfill_name(&mut self, filename: &str) {
        let missing = self
            .name
            .as_deref()
            .map(|n| n.trim().is_empty())
            .unwrap_or(true);
        if missing {
            self.name = Some(display_name_from_filename(filename));
        }
    }

    /// The candidate's name. Only `None` before [`ResumeRecord::backfill_name`] runs.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Filename without directory or extension, e.g. `resumes/jane_doe.pdf` → `jane_doe`.
pub fn display_name_from_filename(filename: &str) -> String {
    let stem = std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .trim();
    if stem.is_empty() {
        filename.to_string()
    } else {
        stem.to_string()
    }
}
