use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        {atomic::AtomicBool, atomic::Ordering},
    },
};

use anyhow::{anyhow, Context};
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::{
    browser_controller::BrowserController,
    pipeline::Pipeline,
    types::ResultMap,
    utils::DEFAULT_TIMEOUT_MS,
};

/// Immutable configuration for one run. Built once at startup from the CLI
/// and never mutated afterwards.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct RunConfig {
    // absolute directory the pdfs are written to
    out_dir: PathBuf,
    // per-navigation timeout in milliseconds
    #[builder(default = "DEFAULT_TIMEOUT_MS")]
    timeout_ms: u64,
    // skip the interactive confirmation prompt
    #[builder(default = "false")]
    auto_accept: bool,
    // extra attempts per failed url
    #[builder(default = "0")]
    url_retries: u32,
    // minimum wait time after navigation in seconds
    #[builder(default = "1")]
    min_wait_after_navigation: u64,
    // maximum wait time after navigation in seconds
    #[builder(default = "3")]
    max_wait_after_navigation: u64,
}

impl RunConfig {
    pub fn default_builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    pub fn out_dir(&self) -> &PathBuf {
        &self.out_dir
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn auto_accept(&self) -> bool {
        self.auto_accept
    }
}

/// Owns the rendering context for one batch: creates the output directory,
/// launches the browser, wires termination signals and drives the pipeline.
pub struct Runner {
    browser: Arc<BrowserController>,
    config: RunConfig,
    should_terminate: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(config: RunConfig) -> anyhow::Result<Self> {
        if config.min_wait_after_navigation > config.max_wait_after_navigation {
            return Err(anyhow!(
                "min wait after navigation ({}) exceeds max wait ({})",
                config.min_wait_after_navigation,
                config.max_wait_after_navigation
            ));
        }

        fs::create_dir_all(&config.out_dir).context(format!(
            "could not create output directory {:?}",
            config.out_dir
        ))?;

        let browser = BrowserController::new(
            config.timeout_ms,
            config.min_wait_after_navigation,
            config.max_wait_after_navigation,
        )
        .context("could not launch the browser")?;

        let should_terminate = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&should_terminate))?;
        signal_hook::flag::register(SIGINT, Arc::clone(&should_terminate))?;

        Ok(Runner {
            browser: Arc::new(browser),
            config,
            should_terminate,
        })
    }

    /// Renders every URL in order and returns the per-URL outcomes. On
    /// SIGINT/SIGTERM the loop stops before the next URL and whatever was
    /// recorded so far is returned.
    pub async fn run(&self, urls: &[String]) -> ResultMap {
        info!(
            "rendering {} urls into {:?} with a {}ms timeout",
            urls.len(),
            self.config.out_dir,
            self.config.timeout_ms
        );

        let pipeline = Pipeline::new(self.config.out_dir.clone(), self.config.url_retries);
        pipeline
            .run(
                self.browser.clone(),
                urls,
                self.should_terminate.clone(),
            )
            .await
    }

    pub fn was_terminated(&self) -> bool {
        self.should_terminate.load(Ordering::Relaxed)
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        debug!("terminating runner, browser goes down with it");
    }
}
