//! Role-based table views: column sets, search, sorting and the optional
//! asset-type row filter.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::CarverError;
use crate::models::{EnrichedRecord, RatingField};

/// Audience selector for the register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    All,
    Ops,
    Sec,
    Comms,
}

impl Role {
    pub fn columns(self) -> Vec<Column> {
        use Column::*;
        use RatingField::*;
        match self {
            Role::Ops => vec![
                Name,
                Type,
                Country,
                Location,
                Rating(Criticality),
                Rating(Recuperability),
                Rating(Effect),
                Impact,
                Score,
                Notes,
            ],
            Role::Sec => vec![
                Name,
                Type,
                Country,
                Location,
                Rating(Accessibility),
                Rating(Vulnerability),
                Rating(Recognizability),
                Likelihood,
                Impact,
                Score,
                Notes,
            ],
            Role::Comms => vec![Name, Country, Location, Score, Notes],
            Role::All => Column::ALL.to_vec(),
        }
    }

    /// Whether an asset of `asset_type` belongs to this role's slice of the
    /// register under [`RowFilterPolicy::ByAssetType`].
    pub fn matches_asset_type(self, asset_type: &str) -> bool {
        let t = asset_type.to_lowercase();
        match self {
            Role::All => true,
            Role::Comms => t.contains("comms"),
            Role::Sec => t.contains("sec") || t.contains("radar"),
            Role::Ops => !["comms", "radar", "sec"].iter().any(|k| t.contains(k)),
        }
    }
}

impl FromStr for Role {
    type Err = CarverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Role::All),
            "ops" => Ok(Role::Ops),
            "sec" => Ok(Role::Sec),
            "comms" => Ok(Role::Comms),
            _ => Err(CarverError::InvalidRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::All => write!(f, "All"),
            Role::Ops => write!(f, "Ops"),
            Role::Sec => write!(f, "Sec"),
            Role::Comms => write!(f, "Comms"),
        }
    }
}

/// How a role narrows the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RowFilterPolicy {
    /// The role only changes which columns are shown
    #[default]
    ColumnsOnly,
    /// The role also hides rows whose asset type belongs to another role
    ByAssetType,
}

/// A column of the register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Type,
    Country,
    Location,
    Rating(RatingField),
    Likelihood,
    Impact,
    Score,
    Notes,
}

/// Value of one table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Name,
        Column::Type,
        Column::Country,
        Column::Location,
        Column::Rating(RatingField::Criticality),
        Column::Rating(RatingField::Accessibility),
        Column::Rating(RatingField::Recuperability),
        Column::Rating(RatingField::Vulnerability),
        Column::Rating(RatingField::Effect),
        Column::Rating(RatingField::Recognizability),
        Column::Likelihood,
        Column::Impact,
        Column::Score,
        Column::Notes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Type => "type",
            Column::Country => "country",
            Column::Location => "location",
            Column::Rating(field) => field.code(),
            Column::Likelihood => "L",
            Column::Impact => "I",
            Column::Score => "score",
            Column::Notes => "notes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Name => "Asset",
            Column::Type => "Type",
            Column::Country => "Country",
            Column::Location => "Location",
            Column::Rating(field) => field.code(),
            Column::Likelihood => "L",
            Column::Impact => "I",
            Column::Score => "Risk",
            Column::Notes => "Notes",
        }
    }

    pub fn value(self, row: &EnrichedRecord) -> CellValue<'_> {
        let r = &row.record;
        match self {
            Column::Name => CellValue::Text(&r.name),
            Column::Type => CellValue::Text(&r.asset_type),
            Column::Country => CellValue::Text(&r.country),
            Column::Location => CellValue::Text(&r.location),
            Column::Rating(field) => CellValue::Number(r.rating(field)),
            Column::Likelihood => CellValue::Number(row.derived.likelihood),
            Column::Impact => CellValue::Number(row.derived.impact),
            Column::Score => CellValue::Number(row.derived.score),
            Column::Notes => CellValue::Text(&r.notes),
        }
    }

    fn compare(self, a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
        match (self.value(a), self.value(b)) {
            (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(&y),
            (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
            // Never mixed within one column
            _ => Ordering::Equal,
        }
    }
}

impl FromStr for Column {
    type Err = CarverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| CarverError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Search and sort settings for the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub search: String,
    pub sort_key: Column,
    pub direction: SortDirection,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: Column::Score,
            direction: SortDirection::Desc,
        }
    }
}

/// Rows and columns ready for rendering.
#[derive(Debug, Clone)]
pub struct TableView {
    pub role: Role,
    pub columns: Vec<Column>,
    pub rows: Vec<EnrichedRecord>,
}

fn matches_search(row: &EnrichedRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let r = &row.record;
    format!(
        "{} {} {} {} {}",
        r.name, r.asset_type, r.country, r.location, r.notes
    )
    .to_lowercase()
    .contains(needle)
}

/// Filter, sort and project enriched rows for a role.
pub fn build_table(
    enriched: Vec<EnrichedRecord>,
    role: Role,
    policy: RowFilterPolicy,
    query: &TableQuery,
) -> TableView {
    let needle = query.search.to_lowercase();
    let mut rows: Vec<EnrichedRecord> = enriched
        .into_iter()
        .filter(|row| matches_search(row, &needle))
        .filter(|row| match policy {
            RowFilterPolicy::ColumnsOnly => true,
            RowFilterPolicy::ByAssetType => role.matches_asset_type(&row.record.asset_type),
        })
        .collect();

    let key = query.sort_key;
    match query.direction {
        SortDirection::Asc => rows.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Desc => rows.sort_by(|a, b| key.compare(b, a)),
    }

    TableView {
        role,
        columns: role.columns(),
        rows,
    }
}
