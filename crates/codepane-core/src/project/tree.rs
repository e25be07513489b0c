use crate::constants::project::{PUBLIC_DIR, ROOT_NAME, SRC_DIR};
use crate::project::files::FileRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A node of the explorer tree, derived from the flat file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderNode {
    pub name: String,
    pub is_folder: bool,
    pub children: Vec<FolderNode>,
    pub file_id: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
}

impl FolderNode {
    fn folder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_folder: true,
            children: Vec::new(),
            file_id: None,
            content: None,
            file_type: None,
        }
    }

    fn leaf(name: &str, file: &FileRecord) -> Self {
        Self {
            name: name.to_string(),
            is_folder: false,
            children: Vec::new(),
            file_id: Some(file.id.clone()),
            content: Some(file.content.clone()),
            file_type: Some(file.file_type.clone()),
        }
    }

    /// Direct child folder with exactly this name.
    pub fn folder_named(&self, name: &str) -> Option<&FolderNode> {
        self.children.iter().find(|c| c.is_folder && c.name == name)
    }

    /// Direct child file with exactly this name.
    pub fn file_named(&self, name: &str) -> Option<&FolderNode> {
        self.children.iter().find(|c| !c.is_folder && c.name == name)
    }

    /// Walk folder names from this node.
    pub fn descend(&self, path: &[&str]) -> Option<&FolderNode> {
        path.iter().try_fold(self, |node, seg| node.folder_named(seg))
    }

    /// Number of file leaves below this node.
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| if c.is_folder { c.file_count() } else { 1 })
            .sum()
    }
}

fn child_folder<'a>(node: &'a mut FolderNode, name: &str) -> &'a mut FolderNode {
    let pos = match node.children.iter().position(|c| c.is_folder && c.name == name) {
        Some(pos) => pos,
        None => {
            node.children.push(FolderNode::folder(name));
            node.children.len() - 1
        }
    };
    &mut node.children[pos]
}

/// Fold a flat file list into the explorer tree.
///
/// The root always holds `public` and `src`. A name without `/` sits
/// directly under the root. A name starting with `public/` or `src/`
/// descends into that folder; any other nested name (`components/Button.js`)
/// is placed under `src`. Folders are matched by exact name.
pub fn build_tree<'a>(files: impl IntoIterator<Item = &'a FileRecord>) -> FolderNode {
    let mut root = FolderNode::folder(ROOT_NAME);
    root.children.push(FolderNode::folder(PUBLIC_DIR));
    root.children.push(FolderNode::folder(SRC_DIR));

    for file in files {
        let segments: Vec<&str> = file.name.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            root.children.push(FolderNode::leaf(&file.name, file));
            continue;
        };

        if dirs.is_empty() {
            root.children.push(FolderNode::leaf(leaf, file));
            continue;
        }

        let (bucket, dirs) = match dirs[0] {
            PUBLIC_DIR => (PUBLIC_DIR, &dirs[1..]),
            SRC_DIR => (SRC_DIR, &dirs[1..]),
            _ => (SRC_DIR, dirs),
        };

        let mut current = child_folder(&mut root, bucket);
        for dir in dirs {
            current = child_folder(current, dir);
        }
        current.children.push(FolderNode::leaf(leaf, file));
    }

    root
}

/// One visible line of the explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorerRow {
    pub depth: usize,
    pub name: String,
    pub is_folder: bool,
    pub expanded: bool,
    pub file_id: Option<String>,
}

/// Explorer view state: the search query and which folders are open.
///
/// Expansion is tracked by folder name alone, so two folders that share
/// a name at different depths open and close together.
#[derive(Debug, Clone)]
pub struct ExplorerView {
    query: String,
    expanded: HashSet<String>,
}

impl Default for ExplorerView {
    fn default() -> Self {
        Self {
            query: String::new(),
            expanded: [PUBLIC_DIR, SRC_DIR].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExplorerView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn is_expanded(&self, folder: &str) -> bool {
        self.expanded.contains(folder)
    }

    pub fn expand(&mut self, folder: &str) {
        self.expanded.insert(folder.to_string());
    }

    /// Flip a folder open or closed. Returns the new state.
    pub fn toggle(&mut self, folder: &str) -> bool {
        if self.expanded.remove(folder) {
            false
        } else {
            self.expanded.insert(folder.to_string());
            true
        }
    }

    /// Children that pass the search filter, folders first, then by name.
    pub fn visible_children<'a>(&self, folder: &'a FolderNode) -> Vec<&'a FolderNode> {
        let needle = self.query.to_lowercase();
        let mut children: Vec<&FolderNode> = folder
            .children
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect();
        children.sort_by(|a, b| match (a.is_folder, b.is_folder) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => collate(&a.name, &b.name),
        });
        children
    }

    /// Flatten the tree into the rows the explorer shows.
    pub fn rows(&self, root: &FolderNode) -> Vec<ExplorerRow> {
        let mut rows = Vec::new();
        self.push_rows(root, 0, &mut rows);
        rows
    }

    fn push_rows(&self, folder: &FolderNode, depth: usize, rows: &mut Vec<ExplorerRow>) {
        for child in self.visible_children(folder) {
            let expanded = child.is_folder && self.is_expanded(&child.name);
            rows.push(ExplorerRow {
                depth,
                name: child.name.clone(),
                is_folder: child.is_folder,
                expanded,
                file_id: child.file_id.clone(),
            });
            if expanded {
                self.push_rows(child, depth + 1, rows);
            }
        }
    }
}

// Case-insensitive first so "app.js" and "App.css" sit together; the raw
// comparison keeps the order total.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
