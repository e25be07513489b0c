use crate::constants::project::PLAINTEXT;
use crate::error::{CodepaneError, Result};
use crate::project::id::IdSource;
use serde::{Deserialize, Serialize};

/// One file of the in-memory project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    /// Display and lookup key; may contain `/` separators.
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

impl FileRecord {
    pub fn new(
        ids: &mut impl IdSource,
        name: impl Into<String>,
        file_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            name: name.into(),
            content: content.into(),
            file_type: file_type.into(),
        }
    }

    pub fn extension(&self) -> &str {
        file_extension(&self.name)
    }

    /// Editor mode for this record's type tag.
    pub fn editor_language(&self) -> &'static str {
        editor_language(&self.file_type)
    }
}

/// Text after the last `.` of a name, or `""` when there is none.
pub fn file_extension(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Map a file type tag to the language mode the editor widget understands.
pub fn editor_language(file_type: &str) -> &'static str {
    match file_type {
        "js" | "jsx" | "javascript" => "javascript",
        "ts" | "tsx" | "typescript" => "typescript",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "md" | "markdown" => "markdown",
        _ => PLAINTEXT,
    }
}

/// The live set of project files. Names are unique across the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSet {
    files: Vec<FileRecord>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from records, rejecting the first duplicated name.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Result<Self> {
        let mut set = Self::new();
        for record in records {
            set.insert(record)?;
        }
        Ok(set)
    }

    /// The files a fresh session opens with.
    pub fn starter(ids: &mut impl IdSource) -> Self {
        Self {
            files: vec![
                FileRecord::new(ids, "index.html", "html", STARTER_HTML),
                FileRecord::new(ids, "styles.css", "css", STARTER_CSS),
                FileRecord::new(ids, "main.js", "js", STARTER_JS),
            ],
        }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Append a record. Fails without touching the set if the name is taken.
    pub fn insert(&mut self, record: FileRecord) -> Result<()> {
        if self.contains_name(&record.name) {
            return Err(CodepaneError::DuplicateFile(record.name));
        }
        self.files.push(record);
        Ok(())
    }

    /// Create an empty file the way the explorer's "new file" form does:
    /// a name without any `.` gets `.{default_type}` appended, and the
    /// record's type is derived from the final extension. Surrounding
    /// whitespace is trimmed and a blank name is rejected.
    pub fn create(
        &mut self,
        name: &str,
        default_type: &str,
        ids: &mut impl IdSource,
    ) -> Result<&FileRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CodepaneError::EmptyFileName);
        }
        let name = if name.contains('.') {
            name.to_string()
        } else {
            format!("{name}.{default_type}")
        };
        if self.contains_name(&name) {
            return Err(CodepaneError::DuplicateFile(name));
        }
        let file_type = file_extension(&name).to_string();
        self.files.push(FileRecord::new(ids, name, file_type, ""));
        Ok(&self.files[self.files.len() - 1])
    }

    /// Replace a file's content. Returns `false` for an unknown id.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.files.iter_mut().find(|f| f.id == id) {
            Some(file) => {
                file.content = content.into();
                true
            }
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

const STARTER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Code Preview</title>
</head>
<body>
  <div id="app"></div>
</body>
</html>"#;

const STARTER_CSS: &str = r#"
body {
  font-family: Arial, sans-serif;
  margin: 0;
  padding: 1rem;
}

#app {
  max-width: 800px;
  margin: 0 auto;
}
"#;

const STARTER_JS: &str = r#"
document.addEventListener('DOMContentLoaded', () => {
  const app = document.getElementById('app');
  app.innerHTML = '<h1>Hello, world!</h1><p>Edit the files to get started.</p>';
});
"#;
