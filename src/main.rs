use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::process::ExitCode;

use pathwalker::config::Config;
use pathwalker::file::loader::{load_document, load_document_from_stdin};
use pathwalker::file::saver::save_document;
use pathwalker::file::{json_view, Document};

/// Pathwalker - walk, search and bubble through nested YAML/JSON documents
#[derive(Parser)]
#[command(name = "pathwalker")]
#[command(version)]
#[command(about = "Walk, search and bubble through nested YAML/JSON documents", long_about = None)]
struct Cli {
    /// Document to read (omit to read from stdin)
    #[arg(short, long, global = true)]
    file: Option<String>,

    /// Location separator (default: ".")
    #[arg(short, long, global = true)]
    separator: Option<String>,

    /// Base location prefixed to every reported location
    #[arg(short, long, global = true)]
    location: Option<String>,

    /// Output format for search results: json or yaml
    #[arg(long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every location and value, containers before their children
    Each,
    /// Print the value at a location
    Search {
        /// Location to resolve, e.g. nested.values.0
        query: String,

        /// Create missing segments as empty mappings
        #[arg(long)]
        create: bool,

        /// Save the document back to --file after creating segments
        #[arg(long, requires = "create")]
        write: bool,
    },
    /// Print each resolved location from the deepest back up to the first segment
    Bubble {
        /// Location to resolve, e.g. nested.values.0
        query: String,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = Config::load();
    if cli.separator.is_some() {
        config.walker.separator = cli.separator.clone();
    }
    if cli.location.is_some() {
        config.walker.location = cli.location.clone();
    }
    if let Some(format) = &cli.format {
        config.output_format = format.clone();
    }

    let mut doc = match &cli.file {
        Some(path) => load_document(path).with_context(|| format!("Failed to load {}", path))?,
        None => load_document_from_stdin()?,
    };

    let walker = config.walker();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Each => {
            walker.each(&doc.value, |location, value| print_entry(&mut out, location, value))?;
        }
        Command::Bubble { query } => {
            walker.bubble(&doc.value, &query, |location, value| {
                print_entry(&mut out, location, value)
            })?;
        }
        Command::Search {
            query,
            create,
            write,
        } => {
            if !create {
                let Some(found) = walker.search(&doc.value, &query) else {
                    eprintln!("No value at '{}'", query);
                    return Ok(ExitCode::FAILURE);
                };
                writeln!(out, "{}", render(found.val, &config.output_format)?)?;
                return Ok(ExitCode::SUCCESS);
            }

            let Some(found) = walker.search_mut(&mut doc.value, &query, true)? else {
                eprintln!("No value at '{}'", query);
                return Ok(ExitCode::FAILURE);
            };
            if let Some(val) = found.val() {
                writeln!(out, "{}", render(val, &config.output_format)?)?;
            } else {
                eprintln!("Created '{}'", query);
            }

            if write {
                save(cli.file.as_deref(), &doc, &config)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn save(file: Option<&str>, doc: &Document, config: &Config) -> Result<()> {
    let path = file.ok_or_else(|| anyhow::anyhow!("--write needs --file"))?;
    save_document(path, doc, config).with_context(|| format!("Failed to save {}", path))
}

fn print_entry(out: &mut impl Write, location: &str, value: &serde_yaml::Value) -> Result<()> {
    writeln!(out, "{}\t{}", location, json_view(value))?;
    Ok(())
}

fn render(value: &serde_yaml::Value, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(&json_view(value))?),
        "yaml" => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
        other => anyhow::bail!("Unknown output format '{}': expected json or yaml", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() {
        let value: serde_yaml::Value = serde_yaml::from_str("a: 1").unwrap();
        assert_eq!(render(&value, "json").unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(render(&value, "yaml").unwrap(), "a: 1");
        assert!(render(&value, "xml").is_err());
    }

    #[test]
    fn test_print_entry() {
        let value: serde_yaml::Value = serde_yaml::from_str("[0, 1]").unwrap();
        let mut buf = Vec::new();
        print_entry(&mut buf, "nested.values", &value).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "nested.values\t[0,1]\n");
    }

    #[test]
    fn test_print_entry_null_and_composite_keys() {
        let doc: serde_yaml::Value = serde_yaml::from_str("a:\n  ~: 1\nb:\n  [1, 2]: x\n").unwrap();
        let walker = pathwalker::walker::PathWalker::new();

        let mut buf = Vec::new();
        walker
            .each(&doc, |location, value| print_entry(&mut buf, location, value))
            .unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "a\t{\"null\":1}\na.null\t1\nb\t{\"[1,2]\":\"x\"}\n"
        );
        assert_eq!(render(&doc["a"], "json").unwrap(), "{\n  \"null\": 1\n}");
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::parse_from([
            "pathwalker",
            "-f",
            "doc.yaml",
            "-s",
            ":",
            "search",
            "a:b",
            "--create",
        ]);
        assert_eq!(cli.separator.as_deref(), Some(":"));
        assert!(matches!(
            cli.command,
            Command::Search { ref query, create: true, write: false } if query == "a:b"
        ));
    }
}
