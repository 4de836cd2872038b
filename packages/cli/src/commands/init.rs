use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::script::{Script, Step};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::Path;
use studio_editor::{NodeDefinition, PropDefinition, PropFormat};

pub const EXAMPLE_SCRIPT_NAME: &str = "example.script.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Undo levels to keep (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub history: usize,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = Config::path(cwd);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing studio project...".bright_blue().bold());

    let mut config = Config {
        definitions: default_definitions(),
        ..Config::default()
    };
    config.editor.max_history_levels = args.history;

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let script_path = cwd.join(EXAMPLE_SCRIPT_NAME);
    if !script_path.exists() {
        fs::write(&script_path, serde_json::to_string_pretty(&example_script())?)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_SCRIPT_NAME);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", EXAMPLE_SCRIPT_NAME);
    println!("  2. Run: studio run {}", EXAMPLE_SCRIPT_NAME);

    Ok(())
}

fn default_definitions() -> Vec<NodeDefinition> {
    vec![
        NodeDefinition::new("Box").with_prop(
            PropDefinition::new("direction", PropFormat::String).with_default(json!("column")),
        ),
        NodeDefinition::new("Text").leaf().with_prop(
            PropDefinition::new("content", PropFormat::String).with_default(json!("Text")),
        ),
        NodeDefinition::new("Guide")
            .with_display_name("Layout guide")
            .leaf()
            .unselectable(),
    ]
}

fn example_script() -> Script {
    let alias = |name: &str| name.to_string();
    Script {
        definitions: Vec::new(),
        steps: vec![
            Step::AddPage {
                alias: Some(alias("home")),
            },
            Step::Create {
                node: alias("Box"),
                alias: alias("card"),
            },
            Step::Create {
                node: alias("Text"),
                alias: alias("title"),
            },
            Step::Insert {
                target: alias("home"),
                nodes: vec![alias("card")],
                before: None,
            },
            Step::Insert {
                target: alias("card"),
                nodes: vec![alias("title")],
                before: None,
            },
            Step::SetProp {
                node: alias("title"),
                key: alias("content"),
                value: json!("Hello"),
            },
            Step::Resize {
                page: alias("home"),
                width: 390.0,
                height: 844.0,
            },
            Step::Undo,
        ],
    }
}
