use std::env;
use std::path::PathBuf;

/// Modal "choose a folder" input. Submitting yields a path, cancelling
/// (or submitting nothing) yields `None`.
#[derive(Debug, Clone, Default)]
pub struct FolderPrompt {
    input: String,
}

impl FolderPrompt {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            input: initial.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop(&mut self) {
        self.input.pop();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn submit(self) -> Option<PathBuf> {
        let raw = self.input.trim();
        if raw.is_empty() {
            return None;
        }
        Some(expand_home(raw))
    }
}

/// Expand a leading `~` to `$HOME`.
fn expand_home(raw: &str) -> PathBuf {
    let home = env::var_os("HOME").map(PathBuf::from);
    match (raw, home) {
        ("~", Some(home)) => home,
        (r, Some(home)) if r.starts_with("~/") => home.join(&r[2..]),
        (r, _) => PathBuf::from(r),
    }
}
