//! Application orchestrator.
//! Loads and merges config, initializes logging, picks the destination volume,
//! runs one staging operation and optionally offers the cleanup prompt.

use anyhow::{Context, Result, anyhow};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use stage_move::cli::Args;
use stage_move::config::{CONFIG_ENV, create_template_config, default_config_path, load_config};
use stage_move::output::{self as out, ConsoleSink};
use stage_move::platform::PREFERRED_VOLUME;
use stage_move::{
    CleanupOutcome, Config, Session, StagingRequest, choose_default_volume, list_volumes,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Config helpers run before logging init so their output stays plain.
    if args.print_config {
        return print_config_location();
    }
    if args.init_config {
        let path = default_config_path()?;
        create_template_config(&path)?;
        out::print_info(&format!("Template config written to {}", path.display()));
        return Ok(());
    }

    let (mut cfg, cfg_path) = load_config()?;
    args.apply_overrides(&mut cfg);

    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;
    if let Some(p) = &cfg_path {
        debug!(path = %p.display(), "Using config file");
    }

    let volumes = list_volumes();
    let default_volume = pick_volume(&cfg, &volumes);

    if args.list_volumes {
        print_volumes(&volumes, &default_volume);
        drop(guard);
        return Ok(());
    }

    let result = stage_and_prompt(&args, &cfg, args.resolved_volume().unwrap_or(default_volume));

    // Flush file logs before exit.
    drop(guard);
    result
}

fn stage_and_prompt(args: &Args, cfg: &Config, volume: PathBuf) -> Result<()> {
    let source = args
        .resolved_source()
        .ok_or_else(|| anyhow!("no source given; pass a folder or .zip archive (see --help)"))?;

    let request = StagingRequest {
        source,
        folder_name: cfg.folder_name.clone(),
        destination: args.resolved_dest(),
        fallback_volume: volume,
    };
    debug!(?request, "Staging request");

    let mut session = match &cfg.temp_root {
        Some(root) => Session::with_temp_root(root),
        None => Session::new(),
    };
    let mut sink = ConsoleSink::new();
    let report = session.run_staging(&request, &mut sink)?;

    if !report.batch.is_clean() {
        out::print_warn(&format!(
            "{} item(s) missing, {} item(s) failed",
            report.batch.missing(),
            report.batch.failed()
        ));
    }

    if !should_prompt(args) {
        return Ok(());
    }
    let Some(pending) = session.pending_deletion().map(Path::to_path_buf) else {
        return Ok(());
    };
    let confirmed = ask_yes_no(&format!("Delete moved folder {}? [y/N]: ", pending.display()))?;
    match session.confirm_cleanup(confirmed, &mut sink)? {
        CleanupOutcome::Declined => out::print_user("Kept moved folder."),
        CleanupOutcome::Deleted(_) | CleanupOutcome::NothingToDelete => {}
    }
    Ok(())
}

/// Configured volume when mounted, else the platform preference, else the first listed.
fn pick_volume(cfg: &Config, volumes: &[PathBuf]) -> PathBuf {
    let preferred = cfg
        .default_volume
        .as_deref()
        .or(PREFERRED_VOLUME.map(Path::new));
    choose_default_volume(volumes, preferred)
}

fn should_prompt(args: &Args) -> bool {
    !args.no_prompt && (args.prompt || atty::is(atty::Stream::Stdin))
}

fn ask_yes_no(question: &str) -> Result<bool> {
    print!("{question}");
    io::stdout().flush().context("flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation from stdin")?;
    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_volumes(volumes: &[PathBuf], default_volume: &Path) {
    if volumes.is_empty() {
        out::print_warn(&format!("No volumes detected; falling back to {}", default_volume.display()));
        return;
    }
    for v in volumes {
        let marker = if v == default_volume { " (default)" } else { "" };
        out::print_user(&format!("{}{}", v.display(), marker));
    }
}

fn print_config_location() -> Result<()> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {} (explicit):\n  {}", CONFIG_ENV, explicit));
        return Ok(());
    }
    let path = default_config_path()?;
    out::print_info(&format!("Default stage_move config path:\n  {}", path.display()));
    if path.exists() {
        out::print_info("A config file exists at that location.");
    } else {
        out::print_info("No config file there yet. Run with --init-config to create a template.");
    }
    Ok(())
}
