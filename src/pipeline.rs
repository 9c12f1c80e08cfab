use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::task;

use crate::{
    browser_controller::PageRenderer,
    types::{RenderError, ResultMap},
    utils::pdf_save_path,
};

/// Sequential URL-to-PDF batch over one shared rendering context.
///
/// URLs are processed strictly in input order, one at a time. A failure is
/// contained to its URL: it is logged, recorded as `false`, and the batch
/// moves on. The accumulated [`ResultMap`] is returned as a value so the
/// caller can summarize whatever was processed, even on an early stop.
pub struct Pipeline {
    out_dir: PathBuf,
    url_retries: u32,
}

impl Pipeline {
    pub fn new(out_dir: PathBuf, url_retries: u32) -> Pipeline {
        Pipeline {
            out_dir,
            url_retries,
        }
    }

    pub async fn run<R>(
        &self,
        renderer: Arc<R>,
        urls: &[String],
        should_terminate: Arc<AtomicBool>,
    ) -> ResultMap
    where
        R: PageRenderer + 'static,
    {
        let mut results = ResultMap::new();

        for url in urls {
            if should_terminate.load(Ordering::Relaxed) {
                warn!(
                    "termination requested, stopping after {} of {} urls",
                    results.len(),
                    urls.len()
                );
                break;
            }

            info!("rendering {}", url);
            match self.render_one(renderer.clone(), url).await {
                Ok(()) => {
                    results.record(url, true);
                }
                Err(e) => {
                    error!("url failed: {} reason: {}", url, e);
                    results.record(url, false);
                }
            }
        }

        results
    }

    async fn render_one<R>(&self, renderer: Arc<R>, url: &str) -> Result<(), RenderError>
    where
        R: PageRenderer + 'static,
    {
        let dest = pdf_save_path(&self.out_dir, url);

        let mut attempt = 0;
        loop {
            let r = renderer.clone();
            let u = url.to_string();
            let d = dest.clone();

            // the browser api blocks, so each attempt runs on the blocking
            // pool while this task awaits it
            let outcome = match task::spawn_blocking(move || r.render(&u, &d)).await {
                Ok(outcome) => outcome,
                Err(e) => Err(RenderError::Task(e)),
            };

            match outcome {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.url_retries => {
                    attempt += 1;
                    warn!(
                        "retrying url {} ({}/{}) after: {}",
                        url, attempt, self.url_retries, e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
