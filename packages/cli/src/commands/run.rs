use crate::config::Config;
use crate::script::{Script, ScriptRunner};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use studio_editor::{EditSession, OutlineRenderer};
use tracing::info;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Edit script to replay
    pub script: PathBuf,

    /// Skip printing the document outline
    #[arg(long)]
    pub no_outline: bool,
}

pub fn run(args: RunArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let script_path = cwd.join(&args.script);

    let source = fs::read_to_string(&script_path)
        .with_context(|| format!("cannot read {}", script_path.display()))?;
    let script: Script = serde_json::from_str(&source)
        .with_context(|| format!("invalid script {}", script_path.display()))?;

    println!(
        "{} {} ({} steps)",
        "▶".bright_blue().bold(),
        args.script.display(),
        script.steps.len()
    );

    let mut session = EditSession::new(config.editor);
    for definition in config.definitions {
        session.document_mut().register_definition(definition);
    }

    let mut runner = ScriptRunner::new(session);
    runner.run(&script)?;
    info!(steps = script.steps.len(), "script finished");

    let session = runner.session();
    if !args.no_outline {
        println!();
        print!("{}", OutlineRenderer::render(session.document()));
    }

    print_summary(session);
    Ok(())
}

fn print_summary(session: &EditSession) {
    let history = session.history();

    println!();
    println!(
        "{} {} undo, {} redo",
        "History:".bold(),
        history.undo_levels(),
        history.redo_levels()
    );
    if let Some(name) = history.undo_name() {
        println!("  {} next undo: {}", "↶".green(), name);
    }
    if let Some(name) = history.redo_name() {
        println!("  {} next redo: {}", "↷".green(), name);
    }

    let selection: Vec<String> = session
        .selection()
        .iter()
        .map(|id| session.document()[*id].node_name().to_string())
        .collect();
    if !selection.is_empty() {
        println!("{} {}", "Selection:".bold(), selection.join(", "));
    }
}
