//! Configuration view, validation and init commands — `ados config`.

use anyhow::Result;

use super::super::ConfigCommands;

fn show_url(url: &Option<String>) -> String {
    match url {
        Some(u) => format!("\"{}\"", u),
        None => "(not set)".to_string(),
    }
}

pub fn cmd_config(project_dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    use ados::config::{AdosConfig, AdosToml};

    let config = AdosConfig::load(project_dir.to_path_buf())?;
    let config_path = config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("adOS Configuration");
            println!("==================");
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No ados.toml found at {}", config_path.display());
                println!("Run 'ados config init' to create one.");
            }
            println!();

            println!("Effective values (with env overrides):");
            let toml = &config.toml;
            println!("[webhooks]");
            println!("  tasks_url = {}", show_url(&toml.webhooks.tasks_url));
            println!("  status_url = {}", show_url(&toml.webhooks.status_url));
            println!("  ad_blocks_url = {}", show_url(&toml.webhooks.ad_blocks_url));
            println!("[http]");
            println!("  timeout_secs = {}", toml.http.timeout_secs);
            println!("[board]");
            println!("  default_account = {}", show_url(&toml.board.default_account));
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = config.toml.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("ados.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !config.ados_dir.exists() {
                std::fs::create_dir_all(&config.ados_dir)?;
            }

            AdosToml::default().save(&config_path)?;

            println!("Created ados.toml at {}", config_path.display());
            println!();
            println!("You can now set:");
            println!("  - [webhooks] tasks_url, status_url, ad_blocks_url");
            println!("  - [http] timeout_secs");
            println!("  - [board] default_account");
            println!();
        }
    }

    Ok(())
}
