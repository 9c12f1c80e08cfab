use std::fmt;

use serde::Serialize;

use crate::types::ResultMap;

/// Tally of a finished (or interrupted) batch.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_urls: Vec<String>,
}

/// Counts successes and failures; `failed_urls` keeps crawl order.
pub fn summarize(results: &ResultMap) -> Summary {
    let succeeded = results.iter().filter(|(_, ok)| *ok).count();
    let failed_urls: Vec<String> = results
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(url, _)| url.to_string())
        .collect();

    Summary {
        succeeded,
        failed: failed_urls.len(),
        failed_urls,
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "successes: {}/{}",
            self.succeeded,
            self.succeeded + self.failed
        )?;
        if !self.failed_urls.is_empty() {
            write!(f, "\nfailed urls:")?;
            for url in &self.failed_urls {
                write!(f, "\n  {}", url)?;
            }
        }
        Ok(())
    }
}
