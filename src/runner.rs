//! Command execution
//!
//! Reads each input, converts it, and routes the rendered documents to
//! stdout, a single output file, or files next to the inputs.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::rule::{Conversion, RuleBuilder, RuleFormatter, VmRule};

/// Where rendered documents end up
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
    NextToInput,
}

impl Destination {
    fn from_cli(cli: &Cli) -> AppResult<Self> {
        match (&cli.output, cli.write) {
            (Some(_), _) if cli.conf_paths.len() > 1 => Err(AppError::Usage(
                "--output accepts a single input; use --write for several".to_string(),
            )),
            (Some(path), _) => Ok(Destination::File(path.clone())),
            (None, true) => Ok(Destination::NextToInput),
            (None, false) => Ok(Destination::Stdout),
        }
    }
}

/// Run the converter for the parsed command line
///
/// Documents and `Wrote <path>` notices go to `out`.
///
/// # Errors
/// Fails on the first input that cannot be read or converted.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> AppResult<()> {
    let destination = Destination::from_cli(cli)?;
    let config = Config::load_optional(cli.config.as_deref())?;
    let builder = RuleBuilder::new(config.rule);
    let formatter = RuleFormatter::new(cli.output_format.into());

    let mut documents: Vec<VmRule> = Vec::with_capacity(cli.conf_paths.len());

    for path in &cli.conf_paths {
        let conversion = convert_file(&builder, path)?;
        info!(
            path = %path.display(),
            metric = %conversion.metric_name,
            rules = conversion.document.rules().count(),
            "Converted check definition"
        );

        if destination == Destination::NextToInput {
            let target = path.with_extension(cli.output_format.extension());
            let rendered = formatter.format(&conversion.document)?;
            write_file(&target, &rendered)?;
            report_written(out, &target)?;
        } else {
            documents.push(conversion.document);
        }
    }

    match destination {
        Destination::Stdout => {
            let rendered = formatter.format_all(&documents)?;
            out.write_all(rendered.as_bytes())
                .map_err(|e| AppError::io("<stdout>", e))?;
        }
        Destination::File(target) => {
            let rendered = formatter.format_all(&documents)?;
            write_file(&target, &rendered)?;
            report_written(out, &target)?;
        }
        Destination::NextToInput => {}
    }

    Ok(())
}

/// Read and convert one `.conf` file
pub fn convert_file(builder: &RuleBuilder, path: &Path) -> AppResult<Conversion> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    builder
        .convert_text(&text)
        .map_err(|source| AppError::Convert {
            path: path.to_path_buf(),
            source,
        })
}

fn write_file(path: &Path, contents: &str) -> AppResult<()> {
    std::fs::write(path, contents).map_err(|e| AppError::io(path, e))
}

fn report_written<W: Write>(out: &mut W, path: &Path) -> AppResult<()> {
    writeln!(out, "Wrote {}", path.display()).map_err(|e| AppError::io("<stdout>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    const CONF: &str = r#"apply Service "queue_depth" {
  vars.check_prometheus_metric_name = "queue_depth"
  vars.check_prometheus_metric_query = "max(rabbitmq_queue_messages{instance=\"%HOST%:15692\", queue=\"jobs\"})"
  vars.check_prometheus_metric_warning = "0:100"
  vars.check_prometheus_metric_critical = "0:500"
}
"#;

    fn setup(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("conf2vmrule").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_run_to_stdout() {
        let dir = setup(&[("queue.conf", CONF)]);
        let input = dir.path().join("queue.conf");
        let mut out = Vec::new();

        run(&cli(&[input.to_str().unwrap()]), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("name: queue-depth"));
        assert!(text.contains(r#"max(rabbitmq_queue_messages{queue="jobs"}) > 100"#));
        assert!(text.contains(r#"max(rabbitmq_queue_messages{queue="jobs"}) > 500"#));
        assert!(!text.contains("%HOST%"));
    }

    #[test]
    fn test_run_write_next_to_input() {
        let dir = setup(&[("a.conf", CONF), ("b.conf", CONF)]);
        let a = dir.path().join("a.conf");
        let b = dir.path().join("b.conf");
        let mut out = Vec::new();

        run(&cli(&["-w", a.to_str().unwrap(), b.to_str().unwrap()]), &mut out).unwrap();

        assert!(dir.path().join("a.yaml").exists());
        assert!(dir.path().join("b.yaml").exists());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("Wrote ")).count(), 2);
    }

    #[test]
    fn test_run_output_file_json() {
        let dir = setup(&[("a.conf", CONF)]);
        let input = dir.path().join("a.conf");
        let target = dir.path().join("rules.json");
        let mut out = Vec::new();

        run(
            &cli(&[
                "--output-format",
                "json",
                "-o",
                target.to_str().unwrap(),
                input.to_str().unwrap(),
            ]),
            &mut out,
        )
        .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(parsed["metadata"]["name"], "queue-depth");
    }

    #[test]
    fn test_output_with_several_inputs_is_usage_error() {
        let err = run(&cli(&["-o", "x.yaml", "a.conf", "b.conf"]), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let err = run(&cli(&["/nonexistent/alert.conf"]), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[test]
    fn test_unconvertible_input() {
        let dir = setup(&[("empty.conf", "apply Service \"nothing\" {}\n")]);
        let input = dir.path().join("empty.conf");
        let err = run(&cli(&[input.to_str().unwrap()]), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::Convert { .. }));
    }
}
