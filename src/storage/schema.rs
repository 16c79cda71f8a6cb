//! Database schema definition

/// SQL schema for the fragment cache
pub const SCHEMA: &str = r#"
-- Extracted code per (task, language); markup may be empty for a known miss
CREATE TABLE IF NOT EXISTS fragments (
    key TEXT PRIMARY KEY,
    task TEXT NOT NULL,
    language TEXT NOT NULL,
    markup TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_fragments_expires ON fragments(expires_at);
"#;
