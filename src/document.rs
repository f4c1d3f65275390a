//! Dialogue documents: the `{"text": [...]}` JSON shape shared by every stage

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: Vec<Block>,

    /// Top-level keys this tool does not know about, kept on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub block_idx: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub jp_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub en_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub jp_text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub en_text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub choices: Vec<Choice>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    #[serde(default, deserialize_with = "nullable")]
    pub jp_text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub en_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::FileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the document as 4-space indented JSON with raw UTF-8,
    /// creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| Error::io(path, std::io::Error::other(e)))?;

        fs::write(path, buf).map_err(|e| Error::io(path, e))
    }

    pub fn block_by_idx_mut(&mut self, block_idx: i64) -> Option<&mut Block> {
        self.text.iter_mut().find(|b| b.block_idx == block_idx)
    }

    pub fn choice_count(&self) -> usize {
        self.text.iter().map(|b| b.choices.len()).sum()
    }
}

/// A document together with its path relative to the tree it was read from.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub rel_path: PathBuf,
    pub document: Document,
}

impl DocumentFile {
    /// Relative path with `/` separators, as recorded in the spreadsheet
    pub fn key(&self) -> String {
        path_key(&self.rel_path)
    }
}

pub fn path_key(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turns a recorded `a/b/c.json` key back into a relative path, refusing
/// anything that would resolve outside the root.
pub fn key_to_rel_path(key: &str) -> Option<PathBuf> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let path: PathBuf = key.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
    let escapes = key.starts_with('/')
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes || path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Recursively lists `*.json` files under `root` in a stable order.
pub fn find_json_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

/// Loads every document under `root`; files that fail to load are returned
/// separately so the caller can report them and carry on.
pub fn load_tree(root: &Path) -> (Vec<DocumentFile>, Vec<Error>) {
    let mut documents = Vec::new();
    let mut failures = Vec::new();

    for path in find_json_files(root) {
        let rel_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        match Document::load(&path) {
            Ok(document) => documents.push(DocumentFile { rel_path, document }),
            Err(e) => {
                tracing::warn!("{}", e);
                failures.push(e);
            }
        }
    }

    (documents, failures)
}
