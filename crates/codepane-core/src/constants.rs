/// Codepane centralized constants.
/// Defaults, wire paths and fixed names live here.

// ─── Ollama ───────────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const CHAT_PATH: &str = "/api/chat";
    pub const TAGS_PATH: &str = "/api/tags";
    /// Environment variable that overrides the configured base URL.
    pub const OLLAMA_URL_ENV: &str = "CODEPANE_OLLAMA_URL";
}

pub mod defaults {
    pub const MODEL: &str = "llama3";
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const MAX_MESSAGES: usize = 200;
    pub const FILE_TYPE: &str = "js";
}

// ─── Project ──────────────────────────────────────────────────────────────────

pub mod project {
    /// Synthetic folders that always exist at the explorer root.
    pub const PUBLIC_DIR: &str = "public";
    pub const SRC_DIR: &str = "src";
    pub const ROOT_NAME: &str = "root";

    /// Language tag used when a fence carries none.
    pub const DEFAULT_LANGUAGE: &str = "text";
    /// Editor mode for types without a known mapping.
    pub const PLAINTEXT: &str = "plaintext";

    pub const HTML_FILE: &str = "index.html";
    pub const CSS_FILE: &str = "styles.css";
    pub const SCRIPT_FILE: &str = "script.js";

    pub const SHORT_ID_LEN: usize = 5;
    pub const ID_SUFFIX_LEN: usize = 8;

    pub const PROJECT_MARKERS: &[(&str, &str)] = &[
        ("Cargo.toml", "rust"),
        ("package.json", "node"),
        ("pyproject.toml", "python"),
        ("requirements.txt", "python"),
        ("go.mod", "go"),
    ];
}

// ─── Preview ──────────────────────────────────────────────────────────────────

pub mod preview {
    /// Tag carried by console records posted from the preview document.
    pub const CONSOLE_SOURCE: &str = "codepane-console";
    pub const CONSOLE_LEVELS: &[&str] = &["log", "info", "warn", "error"];
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "codepane";
    pub const CONFIG_FILE: &str = "config.toml";
}
