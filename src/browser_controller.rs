use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::Emulation::SetEmulatedMedia;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::Tab;
use headless_chrome::{browser::default_executable, Browser, LaunchOptions};
use rand::Rng;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::types::RenderError;

// A4 in inches, the paper size Chrome expects
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Capability the batch pipeline needs from a rendering context: load a URL
/// and leave a finished PDF at `dest`, or fail for that URL alone.
pub trait PageRenderer: Send + Sync {
    fn render(&self, url: &str, dest: &Path) -> std::result::Result<(), RenderError>;
}

pub struct BrowserController {
    browser: Browser,
    tab: Arc<Tab>,
    min_settle_secs: u64,
    max_settle_secs: u64,
}

impl BrowserController {
    /// Launches one browser and opens the single tab every URL in the run
    /// will be navigated through. `timeout_ms` bounds each navigation.
    pub fn new(timeout_ms: u64, min_settle_secs: u64, max_settle_secs: u64) -> Result<Self> {
        let is_docker = std::env::var("IN_DOCKER").is_ok();
        let options = LaunchOptions::default_builder()
            .path(Some(default_executable().map_err(anyhow::Error::msg)?))
            .window_size(Some((1920, 1080)))
            // keep the browser's own idle watchdog above the navigation
            // timeout so a slow page fails per-URL, not browser-wide
            .idle_browser_timeout(Duration::from_millis(timeout_ms) + Duration::from_secs(60))
            // warning only do this if in docker env
            .sandbox(!is_docker)
            .build()
            .expect("invalid browser launch options");
        let browser = Browser::new(options).context("browser launching error")?;

        let tab = browser.new_tab().context("could not create a tab")?;
        tab.set_default_timeout(Duration::from_millis(timeout_ms));

        Ok(BrowserController {
            browser,
            tab,
            min_settle_secs,
            max_settle_secs,
        })
    }

    fn navigate(&self, url: &str) -> Result<()> {
        let nv = self.tab.navigate_to(url)?;
        nv.wait_until_navigated()?;

        // late XHRs and lazy images keep arriving after the navigation
        // settles
        let rndm = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min_settle_secs..=self.max_settle_secs)
        };
        debug!("letting {} settle for {} seconds", url, rndm);
        sleep(Duration::from_secs(rndm));

        Ok(())
    }

    fn export_pdf(&self, url: &str) -> Result<Vec<u8>> {
        // screen media so screen-only styling survives into the PDF
        self.tab
            .call_method(SetEmulatedMedia {
                media: Some("screen".to_string()),
                features: None,
            })
            .context(format!("could not emulate screen media for {}", url))?;

        let data = self
            .tab
            .print_to_pdf(Some(PrintToPdfOptions {
                print_background: Some(true),
                paper_width: Some(A4_WIDTH_IN),
                paper_height: Some(A4_HEIGHT_IN),
                ..Default::default()
            }))
            .context(format!("pdf for {} could not be produced", url))?;
        Ok(data)
    }

    pub fn kill(&self) -> bool {
        let pid = match self.browser.get_process_id() {
            Some(pid) => pid,
            None => return false,
        };
        let s = System::new();
        if let Some(process) = s.process(Pid::from_u32(pid)) {
            debug!("killing browser process with id {}", pid);
            process.kill();
            return true;
        }
        false
    }
}

impl PageRenderer for BrowserController {
    fn render(&self, url: &str, dest: &Path) -> std::result::Result<(), RenderError> {
        self.navigate(url).map_err(RenderError::Navigation)?;

        // the pdf is produced fully in memory; the destination is only
        // touched once the export has succeeded
        let data = self.export_pdf(url).map_err(RenderError::Export)?;

        fs::write(dest, data).map_err(|source| RenderError::Write {
            path: dest.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

impl Drop for BrowserController {
    fn drop(&mut self) {
        debug!("killing browser process...");
        self.kill();
    }
}
