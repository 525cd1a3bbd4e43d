use std::io::{self, BufRead, Write};

use crate::auth::{clear_token, load_token, store_token};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_auth_login(global_profile: Option<&str>, token: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(global_profile);

    let token = match token {
        Some(token) => token.trim().to_string(),
        None => prompt_token()?,
    };
    store_token(&name, &token)?;
    println!("Token stored for profile '{name}'.");
    Ok(())
}

pub fn run_auth_logout(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(global_profile);

    clear_token(&name)?;
    println!("Token removed for profile '{name}'.");
    Ok(())
}

pub fn run_auth_status(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(global_profile);

    let env_token = std::env::var("CURIO_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());
    if env_token.is_some() {
        println!("Using CURIO_TOKEN from the environment.");
        return Ok(());
    }

    if load_token(&name)?.is_some() {
        println!("Token stored for profile '{name}'.");
    } else {
        println!("No token for profile '{name}'. Run `curio auth login`.");
    }
    Ok(())
}

fn prompt_token() -> Result<String, CliError> {
    print!("Paste API token: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let token = line.trim().to_string();
    if token.is_empty() {
        return Err(CliError::Auth("token must not be empty".to_string()));
    }
    Ok(token)
}
