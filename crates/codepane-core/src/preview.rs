use crate::constants::preview::{CONSOLE_LEVELS, CONSOLE_SOURCE};
use crate::project::{FileRecord, FileSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The document handed to the isolated preview frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    /// Name of the HTML file the document was built from.
    pub entry: String,
    pub html: String,
}

fn has_suffix(file: &FileRecord, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| file.name.ends_with(s))
}

/// Compose the preview: the first `.html` file, every `.css` file inlined
/// into the head, every `.js`/`.jsx` file inlined at the end of the body,
/// and the console bridge ahead of them. `None` when there is no HTML.
pub fn compose_preview(files: &FileSet) -> Option<PreviewDocument> {
    let entry = files.iter().find(|f| has_suffix(f, &[".html"]))?;

    let mut head = console_bridge();
    for css in files.iter().filter(|f| has_suffix(f, &[".css"])) {
        head.push_str(&format!(
            "<style data-file=\"{}\">\n{}\n</style>\n",
            css.name,
            css.content.replace("</style", "<\\/style")
        ));
    }

    let mut body = String::new();
    for js in files.iter().filter(|f| has_suffix(f, &[".js", ".jsx"])) {
        body.push_str(&format!(
            "<script data-file=\"{}\">\n{}\n</script>\n",
            js.name,
            js.content.replace("</script", "<\\/script")
        ));
    }

    let html = insert_before(&entry.content, "</head>", &head, true);
    let html = insert_before(&html, "</body>", &body, false);
    Some(PreviewDocument {
        entry: entry.name.clone(),
        html,
    })
}

// Insert `fragment` before the first `tag` (ASCII case-insensitive). When
// the tag is missing the fragment goes at the start or the end.
fn insert_before(html: &str, tag: &str, fragment: &str, at_start: bool) -> String {
    if fragment.is_empty() {
        return html.to_string();
    }
    match html.to_ascii_lowercase().find(tag) {
        Some(pos) => format!("{}{}{}", &html[..pos], fragment, &html[pos..]),
        None if at_start => format!("{fragment}{html}"),
        None => format!("{html}{fragment}"),
    }
}

fn console_bridge() -> String {
    let levels = CONSOLE_LEVELS
        .iter()
        .map(|l| format!("'{l}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"<script data-codepane="console">
(function () {{
  [{levels}].forEach(function (level) {{
    var original = console[level];
    console[level] = function () {{
      var args = Array.prototype.slice.call(arguments);
      try {{
        window.parent.postMessage({{
          source: '{CONSOLE_SOURCE}',
          type: level,
          args: args.map(function (a) {{
            try {{ return JSON.parse(JSON.stringify(a)); }} catch (e) {{ return String(a); }}
          }})
        }}, '*');
      }} catch (e) {{}}
      if (original) {{ original.apply(console, args); }}
    }};
  }});
}})();
</script>
"#
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
}

/// One intercepted `console.*` call from the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleEntry {
    #[serde(rename = "type")]
    pub level: ConsoleLevel,
    pub args: Vec<Value>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct BridgeMessage {
    source: String,
    #[serde(rename = "type")]
    level: ConsoleLevel,
    #[serde(default)]
    args: Vec<Value>,
}

impl ConsoleEntry {
    /// Decode a message posted by the console bridge. Anything else the
    /// frame posts is ignored.
    pub fn from_bridge_message(raw: &str) -> Option<Self> {
        let message: BridgeMessage = serde_json::from_str(raw).ok()?;
        if message.source != CONSOLE_SOURCE {
            return None;
        }
        Some(Self {
            level: message.level,
            args: message.args,
            timestamp: Utc::now(),
        })
    }

    /// Arguments rendered the way the console pane prints them.
    pub fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Console output captured from the preview since the last clear.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    entries: Vec<ConsoleEntry>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw bridge message. Returns whether it was a console record.
    pub fn ingest(&mut self, raw: &str) -> bool {
        match ConsoleEntry::from_bridge_message(raw) {
            Some(entry) => {
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, entry: ConsoleEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConsoleEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
