use crate::constants::project::PROJECT_MARKERS;
use crate::project::files::{file_extension, FileRecord, FileSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of project the in-memory file set looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Rust,
    Node,
    Python,
    Go,
    Web,
    Unknown,
}

/// A suggested shell command. Codepane never executes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunCommand {
    pub kind: ProjectKind,
    pub command: String,
}

fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn find_base<'a>(files: &'a FileSet, base: &str) -> Option<&'a FileRecord> {
    files.iter().find(|f| base_name(&f.name) == base)
}

fn has_extension(files: &FileSet, ext: &str) -> bool {
    files.iter().any(|f| file_extension(&f.name).eq_ignore_ascii_case(ext))
}

impl ProjectKind {
    fn from_marker_tag(tag: &str) -> Self {
        match tag {
            "rust" => Self::Rust,
            "node" => Self::Node,
            "python" => Self::Python,
            "go" => Self::Go,
            _ => Self::Unknown,
        }
    }
}

/// Look for project markers in priority order, then fall back to source
/// file extensions.
pub fn detect_project_kind(files: &FileSet) -> ProjectKind {
    for (marker, tag) in PROJECT_MARKERS {
        if find_base(files, marker).is_some() {
            return ProjectKind::from_marker_tag(tag);
        }
    }
    if has_extension(files, "py") {
        ProjectKind::Python
    } else if has_extension(files, "go") {
        ProjectKind::Go
    } else if has_extension(files, "html") {
        ProjectKind::Web
    } else {
        ProjectKind::Unknown
    }
}

/// Guess the command a user would type to start this project.
pub fn guess_run_command(files: &FileSet) -> Option<RunCommand> {
    let kind = detect_project_kind(files);
    let command = match kind {
        ProjectKind::Rust => "cargo run".to_string(),
        ProjectKind::Node => node_command(files),
        ProjectKind::Python => python_command(files),
        ProjectKind::Go => "go run .".to_string(),
        ProjectKind::Web => "npx serve .".to_string(),
        ProjectKind::Unknown => return None,
    };
    Some(RunCommand { kind, command })
}

fn node_command(files: &FileSet) -> String {
    let manifest: Option<Value> =
        find_base(files, "package.json").and_then(|f| serde_json::from_str(&f.content).ok());
    let scripts = manifest.as_ref().and_then(|m| m.get("scripts"));

    if scripts.and_then(|s| s.get("dev")).is_some() {
        return "npm run dev".to_string();
    }
    if scripts.and_then(|s| s.get("start")).is_some() {
        return "npm start".to_string();
    }
    let entry = manifest
        .as_ref()
        .and_then(|m| m.get("main"))
        .and_then(|m| m.as_str())
        .unwrap_or("index.js");
    format!("npm install && node {entry}")
}

fn python_command(files: &FileSet) -> String {
    let entry = find_base(files, "main.py")
        .or_else(|| find_base(files, "app.py"))
        .or_else(|| files.iter().find(|f| file_extension(&f.name) == "py"))
        .map(|f| f.name.clone())
        .unwrap_or_else(|| "main.py".to_string());

    if find_base(files, "requirements.txt").is_some() {
        format!("pip install -r requirements.txt && python3 {entry}")
    } else {
        format!("python3 {entry}")
    }
}
