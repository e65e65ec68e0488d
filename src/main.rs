use clap::Parser;
use color_eyre::Result;
use rotalog::{config::Config, logging, Level, RotatingWriter, SuffixFormat};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{debug, info};

/// Pipe lines into a time-rotated log file.
#[derive(Parser, Debug)]
#[command(name = "rotalog", version)]
struct Cli {
    /// Config file; created with defaults when missing
    #[arg(short, long, default_value = rotalog::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Live log file path, overrides `output.path_prefix`
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// day, hour, minute, second or a strftime pattern, overrides `output.suffix`
    #[arg(short, long)]
    suffix: Option<SuffixFormat>,

    /// Level stamped on every line, overrides `input.level`
    #[arg(short, long)]
    level: Option<Level>,

    /// Message to log once; stdin is read line by line when omitted
    message: Vec<String>,
}

fn main() -> Result<()> {
    let _log_guard = logging::initialize_logging();
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config);
    if let Some(path) = cli.path {
        config.output.path_prefix = path;
    }
    if let Some(suffix) = cli.suffix {
        config.output.suffix = suffix;
    }
    if let Some(level) = cli.level {
        config.input.level = level;
    }
    debug!(?config, "Resolved configuration");

    let writer = RotatingWriter::new(config.output.path_prefix, config.output.suffix);
    let level = config.input.level;

    if !cli.message.is_empty() {
        writer.log(level, cli.message.join(" "));
        return Ok(());
    }

    let count = pump_lines(
        io::stdin().lock(),
        &writer,
        level,
        config.input.skip_empty_lines,
    )?;

    info!(count, path = %writer.path_prefix().display(), "Input closed");
    Ok(())
}

/// Logs each line of `input`, returning how many were written. Bytes that
/// are not UTF-8 are replaced rather than ending the run.
fn pump_lines<R: BufRead>(
    mut input: R,
    writer: &RotatingWriter,
    level: Level,
    skip_empty_lines: bool,
) -> io::Result<usize> {
    let mut count = 0usize;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if skip_empty_lines && line.trim().is_empty() {
            continue;
        }
        writer.log(level, line);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn invalid_utf8_does_not_stop_the_pump() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingWriter::new(dir.path().join("app"), SuffixFormat::Day);
        let input = Cursor::new(b"before\n\xff\xfe bad\r\n\nafter".to_vec());

        let count = pump_lines(input, &writer, Level::Info, true).unwrap();

        assert_eq!(count, 3);
        let contents = fs::read_to_string(dir.path().join("app")).unwrap();
        let messages: Vec<_> = contents.lines().map(|line| &line[20..]).collect();
        assert_eq!(
            messages,
            ["[INFO] before", "[INFO] \u{fffd}\u{fffd} bad", "[INFO] after"]
        );
    }

    #[test]
    fn keeps_empty_lines_when_asked() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingWriter::new(dir.path().join("app"), SuffixFormat::Day);

        let count = pump_lines(Cursor::new("a\n\nb\n"), &writer, Level::Notice, false).unwrap();

        assert_eq!(count, 3);
        let contents = fs::read_to_string(dir.path().join("app")).unwrap();
        assert!(contents.lines().nth(1).unwrap().ends_with("[NOTICE] "));
    }
}
