pub mod blocks;
pub mod files;
pub mod id;
pub mod reconcile;
pub mod run;
pub mod tree;

pub use blocks::{parse_code_blocks, CodeBlock, FenceScanner};
pub use files::{editor_language, file_extension, FileRecord, FileSet};
pub use id::{generate_id, short_id, IdSource, RandomIds};
pub use reconcile::{reconcile, ChangeKind, FileChange, Reconciliation};
pub use run::{detect_project_kind, guess_run_command, ProjectKind, RunCommand};
pub use tree::{build_tree, ExplorerRow, ExplorerView, FolderNode};
