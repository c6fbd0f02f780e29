//! pick entrypoint: read candidate lines from stdin, choose one on the tty, print it.
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use core_config::{FIELD_SEPARATORS_ENV, LOG_PATH_ENV, Options, log_path};
use core_events::TelemetrySnapshot;
use core_filter::CandidateSet;
use core_render::timing::last_frame_ns;
use core_terminal::TerminalCapabilities;
use core_text::MatchMode;
use tracing::info;

mod logging;
mod runtime;

use runtime::PickerRuntime;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "pick",
    about = "Interactively select one of the lines read from stdin",
    disable_version_flag = true
)]
struct Args {
    /// Split a description off each line and show it next to the text.
    #[arg(short = 'd')]
    descriptions: bool,
    /// Print the description of the chosen line as well (requires -d).
    #[arg(short = 'o')]
    output_description: bool,
    /// Initial query.
    #[arg(short = 'q', value_name = "QUERY")]
    query: Option<String>,
    /// Keep matches in input order.
    #[arg(short = 'S')]
    no_sort: bool,
    /// Use the alternate screen (default).
    #[arg(short = 'x', overrides_with = "inline")]
    alternate: bool,
    /// Draw inline below the cursor instead of on the alternate screen.
    #[arg(short = 'X', overrides_with = "alternate")]
    inline: bool,
    /// Typo tolerant matching (bounded edit distance).
    #[arg(short = 'l')]
    edit_distance: bool,
    /// Write logs to this file (also PICK_LOG).
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Print version.
    #[arg(short = 'v', long = "version")]
    version: bool,
}

impl Args {
    fn options(&self, ifs: Option<OsString>) -> Options {
        Options {
            descriptions: self.descriptions,
            output_description: self.output_description,
            sort: !self.no_sort,
            initial_query: self.query.clone().unwrap_or_default(),
            alternate_screen: !self.inline,
            match_mode: if self.edit_distance {
                MatchMode::EditDistance
            } else {
                MatchMode::Standard
            },
            ..Options::default()
        }
        .with_separators_from(ifs)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    if args.version {
        println!("pick {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = match log_path(args.log_file.clone(), std::env::var_os(LOG_PATH_ENV)) {
        Some(path) => logging::init(&path)?,
        None => None,
    };
    logging::install_panic_hook();
    info!(target: "runtime", "startup");

    let options = args
        .options(std::env::var_os(FIELD_SEPARATORS_ENV))
        .normalize();

    let mut input = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("read candidates from stdin")?;
    let candidates = CandidateSet::parse(&input, options.descriptions, &options.field_separators);
    info!(
        target: "runtime.startup",
        bytes = input.len(),
        candidates = candidates.len(),
        "candidates_loaded"
    );
    drop(input);

    let term = std::env::var("TERM").ok();
    let caps = TerminalCapabilities::for_term(term.as_deref());
    let runtime = PickerRuntime::new(caps, options.alternate_screen);
    let (outcome, session) = runtime.run(options, candidates)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    session
        .emit(&outcome, &mut out)
        .context("write selection to stdout")?;
    out.flush()?;

    TelemetrySnapshot::capture().log();
    info!(
        target: "runtime",
        outcome = outcome.name(),
        last_frame_ns = last_frame_ns(),
        "shutdown"
    );
    Ok(ExitCode::from(outcome.exit_code() as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pick").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let o = parse(&[]).options(None);
        assert!(o.sort);
        assert!(o.alternate_screen);
        assert_eq!(o.match_mode, MatchMode::Standard);
        assert_eq!(o.field_separators, " ");
    }

    #[test]
    fn last_screen_flag_wins() {
        assert!(!parse(&["-x", "-X"]).options(None).alternate_screen);
        assert!(parse(&["-X", "-x"]).options(None).alternate_screen);
    }

    #[test]
    fn flags_map_to_options() {
        let o = parse(&["-d", "-o", "-S", "-l", "-q", "foo"]).options(Some(":".into()));
        assert!(o.descriptions && o.output_description);
        assert!(!o.sort);
        assert_eq!(o.match_mode, MatchMode::EditDistance);
        assert_eq!(o.initial_query, "foo");
        assert_eq!(o.field_separators, ":");
    }

    #[test]
    fn output_description_alone_is_dropped() {
        let o = parse(&["-o"]).options(None).normalize();
        assert!(!o.output_description);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["pick", "-Z"]).is_err());
    }
}
