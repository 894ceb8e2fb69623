use anyhow::{Context, Result};
use tastegraph_catalog::{config, Config};
use toml_edit::{value, DocumentMut};

const KEYS: &str = "spotify_access_token, spotify_api_base, store_path, search_limit";

#[derive(Debug, clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file when no key is given
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

pub fn run(command: Option<ConfigCommand>) -> Result<()> {
    match command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Get { key } => get_config(key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => {
            println!("{}", config::config_file_path().display());
            Ok(())
        }
        ConfigCommand::Example => {
            print!("{}", config::example_config());
            Ok(())
        }
        ConfigCommand::Init => init_config(),
    }
}

fn mask(token: Option<&str>) -> String {
    match token {
        Some(t) if t.chars().count() > 8 => format!("{}…", t.chars().take(8).collect::<String>()),
        Some(_) => "<set>".to_string(),
        None => "<not set>".to_string(),
    }
}

/// Show the current effective configuration.
fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  spotify_access_token: {}", mask(config.spotify_access_token.as_deref()));
    println!("  spotify_api_base: {}", config.spotify_api_base);
    println!("  store_path: {}", config.store_path.display());
    println!("  search_limit: {}", config.search_limit);
    println!(
        "  viewport: {} x {}",
        config.viewport.width, config.viewport.height
    );

    println!("\nPriority: CLI args > ENV vars (TASTE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'tastegraph config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    match key.as_str() {
        "spotify_access_token" => println!(
            "{}",
            config
                .spotify_access_token
                .unwrap_or_else(|| String::from("<not set>"))
        ),
        "spotify_api_base" => println!("{}", config.spotify_api_base),
        "store_path" => println!("{}", config.store_path.display()),
        "search_limit" => println!("{}", config.search_limit),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS),
    }
    Ok(())
}

/// Write `key = value` into a config document, keeping its comments.
fn apply_setting(doc: &mut DocumentMut, key: &str, raw: &str) -> Result<()> {
    match key {
        "spotify_access_token" | "spotify_api_base" | "store_path" => {
            doc[key] = value(raw);
        }
        "search_limit" => {
            let limit: u32 = raw.trim().parse().with_context(|| {
                format!("search_limit must be a non-negative whole number, got {:?}", raw)
            })?;
            doc[key] = value(i64::from(limit));
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS),
    }
    Ok(())
}

/// Set a config value.
fn set_config(key: &str, raw: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let mut doc: DocumentMut = contents
        .parse()
        .context("Config file is not valid TOML")?;

    apply_setting(&mut doc, key, raw)?;

    std::fs::write(&config_path, doc.to_string()).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, raw);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Initialize config file with defaults.
fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure tastegraph.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
