use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single URL inside a batch. Never escapes the pipeline; it
/// is logged and recorded as a `false` entry in the [`ResultMap`].
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("navigation failed: {0}")]
    Navigation(anyhow::Error),
    #[error("pdf export failed: {0}")]
    Export(anyhow::Error),
    #[error("could not write pdf to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("render worker died: {0}")]
    Task(tokio::task::JoinError),
}

/// Per-URL outcomes in crawl order. Keys are unique; recording a URL twice
/// overwrites its outcome but keeps the position of the first insertion.
#[derive(Debug, Default)]
pub struct ResultMap {
    entries: Vec<(String, bool)>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, url: &str, ok: bool) {
        match self.entries.iter_mut().find(|(u, _)| u == url) {
            Some(entry) => entry.1 = ok,
            None => self.entries.push((url.to_string(), ok)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(u, ok)| (u.as_str(), *ok))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut results = ResultMap::new();
        results.record("http://a.com", true);
        results.record("http://b.com", false);
        results.record("http://c.com", true);

        let urls: Vec<&str> = results.iter().map(|(u, _)| u).collect();
        assert_eq!(urls, vec!["http://a.com", "http://b.com", "http://c.com"]);
    }

    #[test]
    fn duplicate_url_overwrites_in_place() {
        let mut results = ResultMap::new();
        results.record("http://a.com", false);
        results.record("http://b.com", true);
        results.record("http://a.com", true);

        assert_eq!(results.len(), 2);
        let entries: Vec<(&str, bool)> = results.iter().collect();
        assert_eq!(entries, vec![("http://a.com", true), ("http://b.com", true)]);
    }
}
