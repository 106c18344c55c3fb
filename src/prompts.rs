//! On-disk prompt storage.
//!
//! A JSON file keyed by prompt type (`page_selection`, `extraction`,
//! `analysis`). Missing keys fall back to built-in defaults on load. Writes
//! are atomic (write-temp-then-rename): a temp file in the same directory,
//! then a rename over the target path. No schema versioning beyond the key
//! names themselves.
//!
//! Threaded explicitly through the Selection/Extraction constructors rather
//! than a process-wide singleton.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SELECTION_PROMPT: &str = "\
You are selecting which pages of a company website are most likely to contain \
business-intelligence fields (industry, products, leadership, location, founding \
year, tech stack, social links). Given the domain, a confidence threshold, a \
maximum selection count, and a JSON array of candidate paths, respond with a JSON \
object of the form {\"selected_paths\": [...], \"path_explanations\": {\"/path\": \
\"fields expected at this path\", ...}}.";

const DEFAULT_EXTRACTION_PROMPT: &str = "\
You are extracting a single flat JSON object describing a company from the \
aggregated page text below. Do not nest fields. Unknown fields must be null. \
Only emit the fields named in the schema.";

const DEFAULT_ANALYSIS_PROMPT: &str = "\
Summarize the company's business model, market position, and notable signals \
from the aggregated page text below in two or three sentences.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    PageSelection,
    Extraction,
    Analysis,
}

impl PromptKind {
    fn key(self) -> &'static str {
        match self {
            PromptKind::PageSelection => "page_selection",
            PromptKind::Extraction => "extraction",
            PromptKind::Analysis => "analysis",
        }
    }

    fn builtin_default(self) -> &'static str {
        match self {
            PromptKind::PageSelection => DEFAULT_PAGE_SELECTION_PROMPT,
            PromptKind::Extraction => DEFAULT_EXTRACTION_PROMPT,
            PromptKind::Analysis => DEFAULT_ANALYSIS_PROMPT,
        }
    }
}

/// Read-mostly prompt handle, threaded through phase constructors.
#[derive(Debug, Clone)]
pub struct PromptStore {
    path: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self {
            path: None,
            overrides: HashMap::new(),
        }
    }
}

impl PromptStore {
    /// In-memory store with only the built-in defaults. Used in tests and
    /// by callers who don't need on-disk prompt editing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads a fresh copy from `path`, if present; missing keys fall back to
    /// built-in defaults. Readers call this on each phase invocation rather
    /// than caching, so external edits (via `set_and_persist`) are picked up.
    pub fn load(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let overrides = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: Some(path),
            overrides,
        })
    }

    #[must_use]
    pub fn get(&self, kind: PromptKind) -> &str {
        self.overrides
            .get(kind.key())
            .map(String::as_str)
            .unwrap_or_else(|| kind.builtin_default())
    }

    /// Atomically persists an override: write to a temp file in the same
    /// directory, then rename over the target path.
    pub fn set_and_persist(&mut self, kind: PromptKind, prompt: impl Into<String>) -> std::io::Result<()> {
        self.overrides.insert(kind.key().to_string(), prompt.into());
        if let Some(path) = &self.path {
            write_atomic(path, &self.overrides)?;
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, overrides: &HashMap<String, String>) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    let contents = serde_json::to_string_pretty(overrides)?;
    std::io::Write::write_all(&mut tmp, contents.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(())
}
