//! Command-line argument parsing for the headless driver
//!
//! Supports:
//! - Opening a file or starting from an empty scratch buffer
//! - Preselecting ranges before a command runs
//! - Running one pipeline command (edit/find/powerEdit)
//! - Printing the result as plain content or a JSON dump

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::command::CommandKind;

/// A branching-history, multi-cursor editing core
#[derive(Parser, Debug)]
#[command(name = "stylus", version, about = "A branching-history, multi-cursor editing core")]
pub struct CliArgs {
    /// File to open (omit for an empty scratch buffer)
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Pipeline script to run before printing
    #[arg(short = 'c', long, value_name = "SCRIPT")]
    pub command: Option<String>,

    /// Operation kind for --command
    #[arg(short = 'k', long, value_enum, default_value_t = KindArg::Edit)]
    pub kind: KindArg,

    /// Preselect a range before running, as `begin..end` or a bare offset
    #[arg(short = 's', long = "select", value_name = "RANGE")]
    pub selections: Vec<String>,

    /// Print a JSON dump instead of the buffer content
    #[arg(long, value_enum, value_name = "WHAT")]
    pub dump: Option<DumpKind>,

    /// Write the resulting content back to the opened file
    #[arg(short = 'w', long)]
    pub write: bool,
}

/// CLI spelling of the pipeline operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Edit,
    Find,
    PowerEdit,
}

impl KindArg {
    fn into_kind(self) -> CommandKind {
        match self {
            KindArg::Edit => CommandKind::Edit,
            KindArg::Find => CommandKind::Find,
            KindArg::PowerEdit => CommandKind::PowerEdit,
        }
    }
}

/// What --dump prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpKind {
    /// Token list for the final content
    Tokens,
    /// The whole version tree with saved cursors
    Versions,
    /// The final selection set
    Selections,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// File to open, if any
    pub path: Option<PathBuf>,
    /// Script to run through the pipeline
    pub command: Option<String>,
    /// Which pipeline operation runs the script
    pub kind: CommandKind,
    /// Ranges to preselect, in order
    pub selections: Vec<(usize, usize)>,
    /// JSON dump selection
    pub dump: Option<DumpKind>,
    /// Save back to the opened file after running
    pub write: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into the driver configuration
    pub fn into_config(self) -> Result<DriverConfig, String> {
        if self.write && self.path.is_none() {
            return Err("--write needs a file to write back to".to_string());
        }

        let mut selections = Vec::with_capacity(self.selections.len());
        for raw in &self.selections {
            selections.push(parse_range(raw)?);
        }

        Ok(DriverConfig {
            path: self.path,
            command: self.command,
            kind: self.kind.into_kind(),
            selections,
            dump: self.dump,
            write: self.write,
        })
    }
}

/// Parse `begin..end` into a range; a bare offset becomes a caret.
fn parse_range(raw: &str) -> Result<(usize, usize), String> {
    if let Some((begin, end)) = raw.split_once("..") {
        let begin = begin
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Bad range '{}': expected begin..end", raw))?;
        let end = end
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Bad range '{}': expected begin..end", raw))?;
        Ok((begin, end))
    } else {
        let at = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Bad range '{}': expected begin..end", raw))?;
        Ok((at, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            path: None,
            command: None,
            kind: KindArg::Edit,
            selections: vec![],
            dump: None,
            write: false,
        }
    }

    #[test]
    fn test_defaults_give_scratch_buffer() {
        let config = args().into_config().unwrap();
        assert!(config.path.is_none());
        assert!(config.command.is_none());
        assert_eq!(config.kind, CommandKind::Edit);
        assert!(config.selections.is_empty());
    }

    #[test]
    fn test_kind_maps_to_pipeline_operation() {
        let config = CliArgs {
            kind: KindArg::PowerEdit,
            ..args()
        }
        .into_config()
        .unwrap();
        assert_eq!(config.kind, CommandKind::PowerEdit);
    }

    #[test]
    fn test_range_parsing() {
        let config = CliArgs {
            selections: vec!["3..7".to_string(), "12".to_string()],
            ..args()
        }
        .into_config()
        .unwrap();
        assert_eq!(config.selections, vec![(3, 7), (12, 12)]);
    }

    #[test]
    fn test_left_facing_range_is_kept() {
        let config = CliArgs {
            selections: vec!["7..3".to_string()],
            ..args()
        }
        .into_config()
        .unwrap();
        // begin > end is a valid left-facing selection
        assert_eq!(config.selections, vec![(7, 3)]);
    }

    #[test]
    fn test_bad_range_is_rejected() {
        let result = CliArgs {
            selections: vec!["x..y".to_string()],
            ..args()
        }
        .into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_write_without_file_is_rejected() {
        let result = CliArgs { write: true, ..args() }.into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_write_with_file_is_accepted() {
        let config = CliArgs {
            path: Some(PathBuf::from("file.txt")),
            write: true,
            ..args()
        }
        .into_config()
        .unwrap();
        assert!(config.write);
    }
}
