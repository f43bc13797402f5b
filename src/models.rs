use serde::{Deserialize, Serialize};

/// Fresh record id: millisecond timestamp plus a random tail, so ids stay
/// unique across concurrent shells without any coordination.
pub fn new_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let tail: u64 = rand::random();
    format!("{millis}-{tail:016x}")
}

/// A title in the author's catalog, with the production costs that feed
/// ROI math.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub series: String,
    pub niche: String,
    pub format: String,
    /// Publication date as YYYY-MM-DD.
    pub publish_date: String,
    #[serde(default)]
    pub design_cost: f64,
    #[serde(default)]
    pub marketing_cost: f64,
}

impl Book {
    pub fn total_cost(&self) -> f64 {
        self.design_cost + self.marketing_cost
    }
}

/// One ledger cell: cumulative units and royalty for a (book, month) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: String,
    pub book_id: String,
    /// Month key as YYYY-MM.
    pub month: String,
    pub units: i64,
    pub royalty: f64,
    /// Fingerprints of the imports that contributed to this cell.
    #[serde(default)]
    pub source_imports: Vec<String>,
}

/// Log entry for one accepted report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub id: String,
    pub import_hash: String,
    pub file_name: String,
    /// Import timestamp as RFC 3339.
    pub imported_at: String,
    pub latest_month: Option<String>,
    pub affected_books: usize,
    pub rows_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub default_niche: String,
    pub default_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_niche: "Uncategorized".to_string(),
            default_format: "Paperback".to_string(),
        }
    }
}

/// The whole persisted world: catalog, ledger, import log and settings.
/// Field names serialize in camelCase so backups interchange with the
/// web edition of the tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub books: Vec<Book>,
    pub sales: Vec<SalesRecord>,
    pub imports: Vec<ImportRecord>,
    pub settings: Settings,
}

/// Intermediate representation of one sales row after column mapping and
/// normalization, before reconciliation against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRow {
    /// Title exactly as the report printed it.
    pub source_title: String,
    /// Lowercased, whitespace-collapsed matching key.
    pub title_key: String,
    pub units: i64,
    pub royalty: f64,
    /// Month key as YYYY-MM.
    pub month: String,
}
