use std::collections::BTreeSet;

use crate::table::searchable_text;
use crate::{JobRecord, NOT_AVAILABLE};

/// A dropdown choice: everything, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Interprets free-form user input; blank or `all` means no filter.
    pub fn from_choice(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => "all",
            Selection::Only(selected) => selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub source: Selection,
    pub qualification: Selection,
    pub query: String,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        self.source != Selection::All
            || self.qualification != Selection::All
            || !self.query.trim().is_empty()
    }

    /// All three predicates must hold; each one is independent of the others.
    pub fn matches(&self, record: &JobRecord) -> bool {
        if !self.source.matches(&record.source) {
            return false;
        }
        if !self.qualification.matches(&record.qualification) {
            return false;
        }
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        searchable_text(record)
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

/// Values offered by the source and qualification dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub sources: Vec<String>,
    pub qualifications: Vec<String>,
}

/// Distinct, ordinally sorted option lists. Placeholder qualifications are
/// left out.
pub fn filter_options(records: &[JobRecord]) -> FilterOptions {
    let sources: BTreeSet<&str> = records.iter().map(|job| job.source.as_str()).collect();
    let qualifications: BTreeSet<&str> = records
        .iter()
        .map(|job| job.qualification.as_str())
        .filter(|qual| !qual.is_empty() && *qual != NOT_AVAILABLE)
        .collect();

    FilterOptions {
        sources: sources.into_iter().map(ToOwned::to_owned).collect(),
        qualifications: qualifications.into_iter().map(ToOwned::to_owned).collect(),
    }
}

/// Records passing the current filters, in their original order.
pub fn visible<'a>(records: &'a [JobRecord], state: &FilterState) -> Vec<&'a JobRecord> {
    records.iter().filter(|job| state.matches(job)).collect()
}
