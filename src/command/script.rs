//! The built-in line script provider.
//!
//! Scripts are stages separated by `|` or newlines, each a word plus
//! whitespace-separated arguments, applied left to right. Text stages map
//! over the input texts; selection stages map over the ranges handed in by
//! `powerEdit`. Mixing the two in one context is an error, reported the same
//! way an external backend would report one.

use super::{CommandProvider, CommandResult, ExampleScript, ScriptKind};
use crate::selection::Selection;

/// In-process provider executing the line script language.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineScriptProvider;

impl LineScriptProvider {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Upper,
    Lower,
    Trim,
    Rev,
    Sort,
    Lines,
    Join(String),
    Prepend(String),
    Append(String),
    Replace(String, String),
    Shift(i64),
    Grow(i64),
    Collapse,
}

impl Stage {
    fn is_selection_stage(&self) -> bool {
        matches!(self, Stage::Shift(_) | Stage::Grow(_) | Stage::Collapse)
    }

    fn name(&self) -> &'static str {
        match self {
            Stage::Upper => "upper",
            Stage::Lower => "lower",
            Stage::Trim => "trim",
            Stage::Rev => "rev",
            Stage::Sort => "sort",
            Stage::Lines => "lines",
            Stage::Join(_) => "join",
            Stage::Prepend(_) => "prepend",
            Stage::Append(_) => "append",
            Stage::Replace(_, _) => "replace",
            Stage::Shift(_) => "shift",
            Stage::Grow(_) => "grow",
            Stage::Collapse => "collapse",
        }
    }
}

fn parse_script(script: &str) -> Result<Vec<Stage>, String> {
    let mut stages = Vec::new();
    for piece in script.split(|c| c == '|' || c == '\n') {
        let mut words = piece.split_whitespace();
        let Some(name) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();
        stages.push(parse_stage(name, &args)?);
    }
    Ok(stages)
}

fn parse_stage(name: &str, args: &[&str]) -> Result<Stage, String> {
    let arity = |want: usize| -> Result<(), String> {
        if args.len() == want {
            Ok(())
        } else {
            Err(format!("{name}: expected {want} argument(s), got {}", args.len()))
        }
    };
    match name {
        "upper" => arity(0).map(|_| Stage::Upper),
        "lower" => arity(0).map(|_| Stage::Lower),
        "trim" => arity(0).map(|_| Stage::Trim),
        "rev" => arity(0).map(|_| Stage::Rev),
        "sort" => arity(0).map(|_| Stage::Sort),
        "lines" => arity(0).map(|_| Stage::Lines),
        "join" => match args {
            [] => Ok(Stage::Join("\n".to_string())),
            [sep] => Ok(Stage::Join(sep.to_string())),
            _ => Err(format!("join: expected at most 1 argument, got {}", args.len())),
        },
        "prepend" => arity(1).map(|_| Stage::Prepend(args[0].to_string())),
        "append" => arity(1).map(|_| Stage::Append(args[0].to_string())),
        "replace" => arity(2).map(|_| Stage::Replace(args[0].to_string(), args[1].to_string())),
        "shift" => {
            arity(1)?;
            let delta = parse_delta(name, args[0])?;
            Ok(Stage::Shift(delta))
        }
        "grow" => {
            arity(1)?;
            let delta = parse_delta(name, args[0])?;
            Ok(Stage::Grow(delta))
        }
        "collapse" => arity(0).map(|_| Stage::Collapse),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_delta(name: &str, arg: &str) -> Result<i64, String> {
    arg.parse::<i64>()
        .map_err(|_| format!("{name}: bad offset '{arg}'"))
}

fn offset_by(value: usize, delta: i64) -> usize {
    if delta < 0 {
        value.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        value + delta as usize
    }
}

fn run_text_stage(stage: &Stage, items: Vec<String>) -> Result<Vec<String>, String> {
    if stage.is_selection_stage() {
        return Err(format!("{}: selection command in a text context", stage.name()));
    }
    let out = match stage {
        Stage::Upper => items.iter().map(|s| s.to_uppercase()).collect(),
        Stage::Lower => items.iter().map(|s| s.to_lowercase()).collect(),
        Stage::Trim => items.iter().map(|s| s.trim().to_string()).collect(),
        Stage::Rev => items.iter().map(|s| s.chars().rev().collect()).collect(),
        Stage::Sort => items
            .iter()
            .map(|s| {
                let mut lines: Vec<&str> = s.lines().collect();
                lines.sort_unstable();
                lines.join("\n")
            })
            .collect(),
        Stage::Lines => items
            .iter()
            .flat_map(|s| s.lines().map(|l| l.to_string()))
            .collect(),
        Stage::Join(sep) => vec![items.join(sep)],
        Stage::Prepend(prefix) => items.iter().map(|s| format!("{prefix}{s}")).collect(),
        Stage::Append(suffix) => items.iter().map(|s| format!("{s}{suffix}")).collect(),
        Stage::Replace(from, to) => items.iter().map(|s| s.replace(from, to)).collect(),
        Stage::Shift(_) | Stage::Grow(_) | Stage::Collapse => unreachable!(),
    };
    Ok(out)
}

fn run_selection_stage(
    stage: &Stage,
    items: Vec<(usize, usize)>,
) -> Result<Vec<(usize, usize)>, String> {
    if !stage.is_selection_stage() {
        return Err(format!("{}: text command in a selection context", stage.name()));
    }
    let out = match stage {
        Stage::Shift(delta) => items
            .iter()
            .map(|&(b, e)| (offset_by(b, *delta), offset_by(e, *delta)))
            .collect(),
        Stage::Grow(delta) => items.iter().map(|&(b, e)| (b, offset_by(e, *delta))).collect(),
        Stage::Collapse => items.iter().map(|&(_, e)| (e, e)).collect(),
        _ => unreachable!(),
    };
    Ok(out)
}

impl CommandProvider for LineScriptProvider {
    fn execute(&self, command: &str, args: &[String]) -> Result<Vec<String>, String> {
        let stages = parse_script(command)?;
        let mut items = args.to_vec();
        for stage in &stages {
            items = run_text_stage(stage, items)?;
        }
        Ok(items)
    }

    fn execute_selections(
        &self,
        command: &str,
        selections: &[Selection],
    ) -> Result<Vec<CommandResult>, String> {
        let stages = parse_script(command)?;
        let mut items: Vec<(usize, usize)> = selections.iter().map(|s| (s.begin, s.end)).collect();
        for stage in &stages {
            items = run_selection_stage(stage, items)?;
        }
        Ok(items
            .into_iter()
            .map(|(begin, end)| CommandResult::Selection { begin, end })
            .collect())
    }

    fn example_script(&self, kind: ScriptKind) -> ExampleScript {
        match kind {
            ScriptKind::Edit => ExampleScript::new(7, 12, "trim | upper"),
            ScriptKind::Replace => ExampleScript::new(8, 11, "replace old new"),
            ScriptKind::PowerEdit => ExampleScript::new(6, 7, "shift 0"),
        }
    }
}
