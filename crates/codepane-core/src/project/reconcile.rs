use crate::constants::project::{CSS_FILE, HTML_FILE, SCRIPT_FILE};
use crate::project::blocks::CodeBlock;
use crate::project::files::{FileRecord, FileSet};
use crate::project::id::IdSource;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
}

/// What happened to one file while applying a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub kind: ChangeKind,
    /// The record as it stands after the change.
    pub file: FileRecord,
}

/// Outcome of applying a batch of blocks to a file set.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub files: FileSet,
    pub changes: Vec<FileChange>,
    /// File the selection should move to, i.e. the target of the last block.
    pub active_file: Option<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Well-known file name for web languages.
pub fn conventional_name(language: &str) -> Option<&'static str> {
    match language {
        "html" => Some(HTML_FILE),
        "css" => Some(CSS_FILE),
        "javascript" | "js" => Some(SCRIPT_FILE),
        _ => None,
    }
}

/// Apply extracted blocks to `files`, in order, producing a new set.
///
/// Each block targets the first file whose name ends in `.<language>`
/// (case-insensitive). This collapses several same-extension files onto
/// one target; callers relying on multi-file projects should know that.
/// When nothing matches but the conventional name for the language is
/// already taken (a `javascript` block against an existing `script.js`),
/// that file is updated so names stay unique. Otherwise a file is created.
///
/// `files` is never touched: the caller swaps the returned set in whole.
pub fn reconcile(blocks: &[CodeBlock], files: &FileSet, ids: &mut impl IdSource) -> Reconciliation {
    let mut next = files.clone();
    let mut changes = Vec::with_capacity(blocks.len());
    let mut active_file = None;

    for block in blocks {
        let suffix = format!(".{}", block.language);
        let fixed = conventional_name(&block.language);

        let target = next
            .iter()
            .find(|f| f.name.to_lowercase().ends_with(&suffix))
            .or_else(|| fixed.and_then(|name| next.find_by_name(name)))
            .map(|f| f.id.clone());

        match target {
            Some(id) => {
                next.set_content(&id, block.code.as_str());
                if let Some(file) = next.get(&id) {
                    info!(
                        file = %file.name,
                        language = %block.language,
                        "updated file from code block"
                    );
                    changes.push(FileChange {
                        kind: ChangeKind::Updated,
                        file: file.clone(),
                    });
                }
                active_file = Some(id);
            }
            None => {
                let name = match fixed {
                    Some(name) => name.to_string(),
                    None => format!("code-{}.{}", ids.short_id(), block.language),
                };
                let record =
                    FileRecord::new(ids, name, block.language.as_str(), block.code.as_str());
                let id = record.id.clone();
                match next.insert(record.clone()) {
                    Ok(()) => {
                        info!(
                            file = %record.name,
                            language = %block.language,
                            "created file from code block"
                        );
                        changes.push(FileChange {
                            kind: ChangeKind::Created,
                            file: record,
                        });
                        active_file = Some(id);
                    }
                    Err(e) => warn!("skipping code block: {e}"),
                }
            }
        }
    }

    Reconciliation {
        files: next,
        changes,
        active_file,
    }
}
