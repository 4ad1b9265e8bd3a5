use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::sync::Arc;

use stylus::cli::{CliArgs, DriverConfig, DumpKind};
use stylus::command::{CommandProvider, LineScriptProvider};
use stylus::config::EditorConfig;
use stylus::selection::Selection;
use stylus::server::EditorServer;

mod dump;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = CliArgs::parse();
    let driver = args.into_config().map_err(|e| anyhow!(e))?;

    let config = EditorConfig::load();
    stylus::tracing::init(&config.log_level);
    tracing::info!(provider = %config.provider, "stylus starting");

    let provider = make_provider(&config.provider);
    let mut server = EditorServer::new(provider);

    let id = match &driver.path {
        Some(path) => server
            .open_file(path)
            .with_context(|| format!("opening {}", path.display()))?,
        None => server.open_scratch(""),
    };

    preselect(&mut server, id, &driver)?;

    if let Some(script) = &driver.command {
        server
            .apply_command(id, driver.kind, script)
            .context("running command")?;
    }

    if driver.write {
        server.save(id).context("writing file")?;
    }

    let file = server.file(id).ok_or_else(|| anyhow!("file vanished"))?;
    let buffer = file.buffer();
    match driver.dump {
        Some(DumpKind::Tokens) => {
            println!("{}", serde_json::to_string_pretty(&dump::tokens(buffer))?);
        }
        Some(DumpKind::Versions) => {
            println!("{}", serde_json::to_string_pretty(&dump::versions(buffer))?);
        }
        Some(DumpKind::Selections) => {
            println!("{}", serde_json::to_string_pretty(&dump::selections(buffer))?);
        }
        None => {
            print!("{}", buffer.content());
        }
    }

    Ok(())
}

fn make_provider(name: &str) -> Arc<dyn CommandProvider> {
    match name {
        "line-script" => Arc::new(LineScriptProvider::new()),
        other => {
            tracing::warn!(provider = other, "unknown provider, using line-script");
            Arc::new(LineScriptProvider::new())
        }
    }
}

/// Replace the initial caret with the ranges asked for on the command line,
/// clamped to the content.
fn preselect(server: &mut EditorServer, id: stylus::server::FileId, driver: &DriverConfig) -> Result<()> {
    if driver.selections.is_empty() {
        return Ok(());
    }
    let buffer = server
        .file_mut(id)
        .ok_or_else(|| anyhow!("file vanished"))?
        .buffer_mut();
    let len = buffer.len();
    let selections: Vec<Selection> = {
        let text = buffer.text();
        driver
            .selections
            .iter()
            .map(|&(begin, end)| Selection::span(text, begin.min(len), end.min(len)))
            .collect()
    };
    buffer.selections = selections;
    Ok(())
}
