//! stackbuddy - CLI entry point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use stackbuddy::{
    cli::{Args, Commands, Config},
    hotkeys::{shortcut_groups, KeyCombo, Platform},
    menu::{accelerator_from_keys, Menu, MenuDispatcher, MenuEffects, MenuOptions},
    streaming::LmStudioClient,
    types::{EvalOptions, MaxTokens, Message},
};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.clone())?;
    init_tracing(args.log_level(&config.logging.level));

    if let Some(endpoint) = &args.endpoint {
        config.ai.endpoint = endpoint.clone();
    }
    if let Some(model) = &args.model {
        config.ai.model = model.clone();
    }
    config.validate()?;

    match &args.command {
        Commands::Ask {
            prompt,
            system,
            stream,
            max_tokens,
        } => {
            run_ask(&config, prompt, system.as_deref(), *stream, *max_tokens).await?;
        }
        Commands::Shortcuts => list_shortcuts(),
        Commands::MenuEvent { id } => show_menu_event(id),
        Commands::Config => show_config(&config),
        Commands::Health => run_health(&config).await?,
    }

    Ok(())
}

/// `RUST_LOG` wins over flags and config
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_ask(
    config: &Config,
    prompt: &str,
    system: Option<&str>,
    stream: bool,
    max_tokens: Option<i64>,
) -> Result<()> {
    let client = LmStudioClient::with_config(&config.ai)?;

    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(prompt));

    let mut options = EvalOptions::new();
    if let Some(max_tokens) = max_tokens {
        options = options.max_tokens(MaxTokens::from_wire(max_tokens));
    }

    if stream {
        options = options.on_token(|token| {
            print!("{}", token);
            let _ = std::io::stdout().flush();
        });
        client.evaluate(&messages, options).await?;
        println!();
    } else {
        let answer = client.evaluate(&messages, options).await?;
        println!("{}", answer);
    }

    Ok(())
}

fn list_shortcuts() {
    let platform = Platform::current();

    for group in shortcut_groups() {
        println!("{}", group.name.bold());
        for shortcut in group.shortcuts {
            let combo = match KeyCombo::parse(shortcut.keys, platform) {
                Ok(combo) => combo.to_string(),
                Err(e) => format!("{}", e).red().to_string(),
            };
            println!("  {:<28} {:<16} {}", shortcut.title, shortcut.keys.cyan(), combo);
            if let Some(description) = shortcut.description {
                println!("  {}", description.dimmed());
            }
        }
        println!();
    }
}

/// Prints what a menu action would do instead of doing it
struct TerminalEffects;

impl MenuEffects for TerminalEffects {
    fn emit(&self, event: &str, payload: &str) -> stackbuddy::Result<()> {
        println!("emit {} {}", event, payload.cyan());
        Ok(())
    }

    fn open_url(&self, url: &str) -> stackbuddy::Result<()> {
        println!("open {}", url.underline());
        Ok(())
    }

    fn open_logs_folder(&self) -> stackbuddy::Result<()> {
        println!("open logs folder");
        Ok(())
    }

    fn open_config_folder(&self) -> stackbuddy::Result<()> {
        match Config::config_path().as_deref().and_then(|path| path.parent()) {
            Some(dir) => println!("open {}", dir.display()),
            None => println!("{}", "no home directory".yellow()),
        }
        Ok(())
    }

    fn toggle_devtools(&self) {
        println!("toggle developer tools");
    }
}

fn show_menu_event(id: &str) {
    let menu = Menu::build(Platform::current(), &MenuOptions::default());
    match menu.get(id) {
        Some(item) => {
            let accelerator = item.accelerator.unwrap_or("-");
            println!("{} {} [{}]", "✓".green(), item.label, accelerator);
        }
        None => println!("{} {} is not in the menu on this platform", "⚠".yellow(), id),
    }

    let action = MenuDispatcher::new(TerminalEffects).handle_event(id);
    println!("{:?}", action);
}

fn show_config(config: &Config) {
    println!("{}", "stackbuddy configuration".bold());
    println!();

    match Config::config_path() {
        Some(path) => println!("File: {}", path.display()),
        None => println!("File: {}", "no home directory".yellow()),
    }
    println!();

    println!("LM Studio:");
    println!("  Endpoint:    {}", config.ai.endpoint);
    println!("  Model:       {}", config.ai.model);
    println!("  Temperature: {}", config.ai.temperature);
    match config.ai.max_tokens() {
        MaxTokens::Limit(n) => println!("  Max tokens:  {}", n),
        MaxTokens::Unlimited => println!("  Max tokens:  unlimited"),
    }
    println!();

    println!("Logging:");
    println!("  Level:       {}", config.logging.level);
    println!();

    println!("Shortcut accelerators:");
    for group in shortcut_groups() {
        for shortcut in group.shortcuts {
            println!("  {:<28} {}", shortcut.id, accelerator_from_keys(shortcut.keys));
        }
    }
}

async fn run_health(config: &Config) -> Result<()> {
    let client = LmStudioClient::with_config(&config.ai)?;

    println!("Checking {} ...", client.base_url());
    let healthy = client.health_check().await.unwrap_or(false);

    if healthy {
        println!("{} LM Studio is reachable (model: {})", "✓".green(), client.model());
    } else {
        eprintln!("{} LM Studio is not reachable", "✗".red());
        eprintln!("  Start the local server in LM Studio, or pass --endpoint");
    }

    std::process::exit(if healthy { 0 } else { 1 });
}
