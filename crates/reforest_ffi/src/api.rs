//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose outline text helpers and journal operations to Dart via FRB.
//! - Keep error semantics simple: envelopes carry `ok` plus a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Structured payloads cross the boundary as JSON strings using the
//!   same wire names as the persisted records.

use log::{info, warn};
use reforest_core::db::open_db;
use reforest_core::outline::line_editor::{
    continuation_prefix, renumber_lines, toggle_checkbox_line,
};
use reforest_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_marked,
    ping as ping_inner, serialize_marked, JournalService, SqliteKeyValueStore,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

const STORE_DB_FILE_NAME: &str = "reforest.sqlite3";
const STORE_PATH_ENV: &str = "REFOREST_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the SQLite file used by journal calls.
///
/// Must run before the first journal call; afterwards only the already
/// active path is accepted. Returns empty string on success and error
/// message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        info!("event=store_path_configure module=ffi status=ok");
        String::new()
    } else {
        warn!("event=store_path_configure module=ffi status=rejected reason=already_resolved");
        format!(
            "store path already resolved to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Parsed outline envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineParseResponse {
    pub ok: bool,
    /// JSON array of nested nodes (`subLines`), empty on failure.
    pub nodes_json: String,
    /// Total number of nodes, nested ones included.
    pub node_count: u32,
    pub message: String,
}

/// Journal action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalActionResponse {
    pub ok: bool,
    /// Id of the affected category or content.
    pub id: Option<String>,
    /// Normalized marked text when the action edited an answer.
    pub text: Option<String>,
    pub message: String,
}

impl JournalActionResponse {
    fn success(message: impl Into<String>, id: String, text: Option<String>) -> Self {
        Self {
            ok: true,
            id: Some(id),
            text,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            text: None,
            message: message.into(),
        }
    }
}

/// Journal snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLoadResponse {
    pub ok: bool,
    /// JSON array of categories, empty on failure.
    pub categories_json: String,
    pub message: String,
}

/// Parses marked editor text into a JSON node tree.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_parse(text: String) -> OutlineParseResponse {
    let outline = parse_marked(&text);
    let node_count = u32::try_from(outline.len()).unwrap_or(u32::MAX);
    match serde_json::to_string(&outline) {
        Ok(nodes_json) => OutlineParseResponse {
            ok: true,
            nodes_json,
            node_count,
            message: format!("Parsed {node_count} line(s)."),
        },
        Err(err) => OutlineParseResponse {
            ok: false,
            nodes_json: String::new(),
            node_count: 0,
            message: format!("outline_parse failed: {err}"),
        },
    }
}

/// Normalizes marked text: blank lines dropped, depths clamped, numbers
/// recomputed.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_format(text: String) -> String {
    serialize_marked(parse_marked(&text).roots())
}

/// Renumbers numbered lines without touching anything else.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_renumber(text: String) -> String {
    renumber_lines(&text)
}

/// Prefix for the line inserted after `line` on return.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_continuation_prefix(line: String) -> String {
    continuation_prefix(&line)
}

/// Flips the checkbox glyph of one line; `None` when the line has none.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_toggle_checkbox_line(line: String) -> Option<String> {
    toggle_checkbox_line(&line)
}

/// Loads every category with its contents.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_load() -> JournalLoadResponse {
    journal_load_at(&resolve_store_path())
}

fn journal_load_at(db_path: &Path) -> JournalLoadResponse {
    let loaded = with_journal_at(db_path, |service| {
        serde_json::to_string(service.categories()).map_err(|err| err.to_string())
    });
    match loaded {
        Ok(categories_json) => JournalLoadResponse {
            ok: true,
            categories_json,
            message: "Journal loaded.".to_string(),
        },
        Err(err) => JournalLoadResponse {
            ok: false,
            categories_json: String::new(),
            message: format!("journal_load failed: {err}"),
        },
    }
}

/// Appends a new empty category.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_add_category(title: String) -> JournalActionResponse {
    journal_add_category_at(&resolve_store_path(), title)
}

fn journal_add_category_at(db_path: &Path, title: String) -> JournalActionResponse {
    let added = with_journal_at(db_path, |service| {
        service.add_category(title).map_err(|err| err.to_string())
    });
    match added {
        Ok(id) => JournalActionResponse::success("Category added.", id.to_string(), None),
        Err(err) => JournalActionResponse::failure(format!("journal_add_category failed: {err}")),
    }
}

/// Replaces one answer from marked editor text, keeping ids of unchanged
/// lines. Returns the normalized text.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_edit_answer(
    category_id: String,
    content_id: String,
    text: String,
) -> JournalActionResponse {
    journal_edit_answer_at(&resolve_store_path(), &category_id, &content_id, &text)
}

fn journal_edit_answer_at(
    db_path: &Path,
    category_id: &str,
    content_id: &str,
    text: &str,
) -> JournalActionResponse {
    let ids = parse_id(category_id).and_then(|category| Ok((category, parse_id(content_id)?)));
    let (category_id, content_id) = match ids {
        Ok(ids) => ids,
        Err(err) => {
            return JournalActionResponse::failure(format!("journal_edit_answer failed: {err}"))
        }
    };

    let edited = with_journal_at(db_path, |service| {
        let content = service
            .edit_answer(category_id, content_id, text)
            .map_err(|err| err.to_string())?;
        Ok(serialize_marked(content.sub_lines.roots()))
    });
    match edited {
        Ok(normalized) => JournalActionResponse::success(
            "Answer saved.",
            content_id.to_string(),
            Some(normalized),
        ),
        Err(err) => JournalActionResponse::failure(format!("journal_edit_answer failed: {err}")),
    }
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid id `{raw}`: {err}"))
}

fn resolve_store_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_journal_at<T>(
    db_path: &Path,
    f: impl FnOnce(&mut JournalService<SqliteKeyValueStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("store DB open failed: {err}"))?;
    let store = SqliteKeyValueStore::try_new(&conn)
        .map_err(|err| format!("store init failed: {err}"))?;
    let mut service = JournalService::load(store).map_err(|err| err.to_string())?;
    f(&mut service)
}
