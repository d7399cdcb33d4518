//! Test helpers for preparing extract command inputs on disk.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use shillscope_core::RatingTable;
use std::fs;
use tempfile::TempDir;

/// Temporary workspace whose lifetime bounds the files written into it.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_ratings(&self, name: &str, table: &RatingTable) -> Utf8PathBuf {
        let payload = serde_json::to_vec(table).expect("serialise ratings");
        let path = self.path(name);
        write_utf8(&path, &payload);
        path
    }

    pub(super) fn write_user_ids(&self, name: &str, ids: &[u64]) -> Utf8PathBuf {
        let payload = serde_json::to_vec(ids).expect("serialise user ids");
        let path = self.path(name);
        write_utf8(&path, &payload);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
}

/// Parse a feature table document into its rows.
pub(super) fn feature_rows(payload: &[u8]) -> Vec<Value> {
    match serde_json::from_slice(payload).expect("feature table should be JSON") {
        Value::Array(rows) => rows,
        other => panic!("expected a JSON array of rows, found {other}"),
    }
}

/// Authenticity label recorded for `user_id` in `rows`.
pub(super) fn label_of(rows: &[Value], user_id: u64) -> Option<u64> {
    rows.iter()
        .find(|row| row.get("user_id").and_then(Value::as_u64) == Some(user_id))
        .and_then(|row| row.get("authenticity"))
        .and_then(Value::as_u64)
}
