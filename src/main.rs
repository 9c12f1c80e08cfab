use std::{path, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm};
use env_logger::Env;
use log::{debug, info, warn};
use url2pdf::{
    report::summarize,
    runner::{RunConfig, Runner},
    utils::{DEFAULT_OUT_DIR, DEFAULT_TIMEOUT_MS},
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render web pages to PDF", long_about = None)]
struct Args {
    /// Urls to render into pdfs
    #[arg(value_name = "URL", num_args = 1.., required = true)]
    urls: Vec<String>,
    /// Output directory path
    #[arg(short = 'o', long, default_value = DEFAULT_OUT_DIR)]
    out: PathBuf,
    /// Per-navigation timeout in milliseconds
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,
    /// Auto accepts the confirmation prompt
    #[arg(short = 'y', long)]
    auto_accept: bool,
    /// Number of retries per failed URL
    #[arg(short = 'r', long, default_value_t = 0)]
    retries: u32,
    /// Minimum time in seconds to wait after a tab navigates to a page
    #[arg(long, default_value_t = 1)]
    min_wait_after_navigation: u64,
    /// Maximum time in seconds to wait after a tab navigates to a page
    #[arg(long, default_value_t = 3)]
    max_wait_after_navigation: u64,
    /// Adds verbosity level
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Removes verbosity level
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    quiet: u8,
    /// Mutes all output
    #[arg(short = 'm', long)]
    mute: bool,
    /// Also print the summary as json on stdout
    #[arg(long)]
    json: bool,
}

// RUST_LOG still wins over the flags when it is set
fn log_level(args: &Args) -> &'static str {
    if args.mute {
        return "off";
    }
    match args.verbose as i32 - args.quiet as i32 {
        n if n >= 2 => "trace",
        1 => "debug",
        0 => "info",
        -1 => "warn",
        -2 => "error",
        _ => "off",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level(&args))).init();
    debug!("options: {:?}", args);

    let out_dir = path::absolute(&args.out)
        .context(format!("could not resolve output directory {:?}", args.out))?;

    let config = RunConfig::default_builder()
        .out_dir(out_dir)
        .timeout_ms(args.timeout)
        .auto_accept(args.auto_accept)
        .url_retries(args.retries)
        .min_wait_after_navigation(args.min_wait_after_navigation)
        .max_wait_after_navigation(args.max_wait_after_navigation)
        .build()?;

    info!("{} urls", args.urls.len());
    info!("timeout is set to {}ms", config.timeout_ms());
    info!("output is set to {:?}", config.out_dir());

    if !config.auto_accept() {
        let ok = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Do you wish to render?")
            .default(true)
            .interact()?;
        if !ok {
            info!("nothing rendered, exiting");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let runner = Runner::new(config)?;
    let results = runner.run(&args.urls).await;

    if runner.was_terminated() {
        warn!("run was interrupted, reporting what completed");
    }

    let summary = summarize(&results);
    if summary.failed > 0 {
        warn!("{}", summary);
    } else {
        info!("{}", summary);
        info!("everything completed without any failure");
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(if summary.failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
