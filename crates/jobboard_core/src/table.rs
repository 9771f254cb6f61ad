//! Projection of records into display rows, plus sorting and paging.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::JobRecord;

pub const DEFAULT_PAGE_SIZE: usize = 25;

const LINK_LABEL: &str = "View";
const NO_LINK_LABEL: &str = "N/A";

const LISTING_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Danger,
}

impl BadgeStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeStyle::Primary => "primary",
            BadgeStyle::Secondary => "secondary",
            BadgeStyle::Success => "success",
            BadgeStyle::Info => "info",
            BadgeStyle::Warning => "warning",
            BadgeStyle::Danger => "danger",
        }
    }
}

/// Source name to badge style. Unknown sources get [`BadgeStyle::Secondary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgePalette(BTreeMap<String, BadgeStyle>);

impl Default for BadgePalette {
    fn default() -> Self {
        Self(BTreeMap::from([
            ("CareerPower".to_string(), BadgeStyle::Primary),
            ("AllGovtJobs".to_string(), BadgeStyle::Success),
            ("AllGovtJobs-Filtered".to_string(), BadgeStyle::Info),
            ("SarkariResult".to_string(), BadgeStyle::Warning),
        ]))
    }
}

impl BadgePalette {
    pub fn new(styles: BTreeMap<String, BadgeStyle>) -> Self {
        Self(styles)
    }

    pub fn style_for(&self, source: &str) -> BadgeStyle {
        self.0.get(source).copied().unwrap_or(BadgeStyle::Secondary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCell {
    Open(String),
    Disabled,
}

impl LinkCell {
    /// Only absolute http(s) URLs become actionable links.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return LinkCell::Disabled;
        }
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                LinkCell::Open(trimmed.to_string())
            }
            _ => LinkCell::Disabled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkCell::Open(_) => LINK_LABEL,
            LinkCell::Disabled => NO_LINK_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub source: String,
    pub badge: BadgeStyle,
    pub title: String,
    pub posts: String,
    pub qualification: String,
    pub last_date: String,
    pub link: LinkCell,
}

impl TableRow {
    fn column(&self, column: SortColumn) -> &str {
        match column {
            SortColumn::Source => &self.source,
            SortColumn::Title => &self.title,
            SortColumn::Posts => &self.posts,
            SortColumn::Qualification => &self.qualification,
            SortColumn::LastDate => &self.last_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Source,
    Title,
    Posts,
    Qualification,
    LastDate,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Source,
        SortColumn::Title,
        SortColumn::Posts,
        SortColumn::Qualification,
        SortColumn::LastDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortColumn::Source => "source",
            SortColumn::Title => "title",
            SortColumn::Posts => "posts",
            SortColumn::Qualification => "qualification",
            SortColumn::LastDate => "last_date",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase().replace('-', "_");
        match wanted.as_str() {
            "qual" => Ok(SortColumn::Qualification),
            "date" | "lastdate" => Ok(SortColumn::LastDate),
            _ => SortColumn::ALL
                .into_iter()
                .find(|column| column.name() == wanted)
                .ok_or_else(|| format!("unknown column {raw:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    /// Last date, newest first, compared as text.
    fn default() -> Self {
        Self {
            column: SortColumn::LastDate,
            direction: SortDirection::Descending,
        }
    }
}

/// How the last-date column is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrdering {
    /// Plain string comparison.
    #[default]
    Text,
    /// Calendar comparison of recognised formats; unrecognised values go last.
    Parsed,
}

/// One page of the sorted, filtered table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    /// Zero-based page index after clamping.
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Rows matching the filters.
    pub total: usize,
}

impl TablePage {
    /// One-based index of the first row shown, or 0 for an empty table.
    pub fn start(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page * self.page_size + 1
        }
    }

    /// One-based index of the last row shown.
    pub fn end(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page * self.page_size + self.rows.len()
        }
    }
}

pub fn project_row(record: &JobRecord, palette: &BadgePalette) -> TableRow {
    TableRow {
        source: record.source.clone(),
        badge: palette.style_for(&record.source),
        title: record.title.clone(),
        posts: record.posts.clone(),
        qualification: record.qualification.clone(),
        last_date: record.last_date.clone(),
        link: LinkCell::from_raw(&record.link),
    }
}

/// Text of every displayed cell, as the free-text search sees it.
pub fn searchable_text(record: &JobRecord) -> String {
    [
        record.source.as_str(),
        record.title.as_str(),
        record.posts.as_str(),
        record.qualification.as_str(),
        record.last_date.as_str(),
        LinkCell::from_raw(&record.link).label(),
    ]
    .join(" ")
}

/// Stable sort; ties keep feed order.
pub fn sort_rows(rows: &mut [TableRow], order: SortOrder, dates: DateOrdering) {
    rows.sort_by(|a, b| {
        let left = a.column(order.column);
        let right = b.column(order.column);
        match (order.column, dates) {
            (SortColumn::LastDate, DateOrdering::Parsed) => {
                compare_listing_dates(left, right, order.direction)
            }
            _ => order.direction.apply(left.cmp(right)),
        }
    });
}

pub fn build_rows(
    records: &[&JobRecord],
    palette: &BadgePalette,
    order: SortOrder,
    dates: DateOrdering,
) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = records
        .iter()
        .map(|record| project_row(record, palette))
        .collect();
    sort_rows(&mut rows, order, dates);
    rows
}

/// Slices `rows` into the requested page, clamping out-of-range indices.
pub fn paginate(rows: Vec<TableRow>, page: usize, page_size: usize) -> TablePage {
    let page_size = page_size.max(1);
    let total = rows.len();
    let page_count = total.div_ceil(page_size).max(1);
    let page = page.min(page_count - 1);
    let rows = rows
        .into_iter()
        .skip(page * page_size)
        .take(page_size)
        .collect();

    TablePage {
        rows,
        page,
        page_count,
        page_size,
        total,
    }
}

pub fn parse_listing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    LISTING_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn compare_listing_dates(left: &str, right: &str, direction: SortDirection) -> Ordering {
    match (parse_listing_date(left), parse_listing_date(right)) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => direction.apply(left.cmp(right)),
    }
}
