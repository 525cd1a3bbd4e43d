use crate::config_profiles::{
    is_http_url, normalize_profile_name, normalize_text_option, CliProfilesConfig,
};
use crate::error::CliError;

pub fn run_config_init(
    global_profile: Option<&str>,
    profile: Option<&str>,
    api_base_url: Option<String>,
    activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = normalize_profile_name(profile)
        .or_else(|| normalize_profile_name(global_profile))
        .unwrap_or_else(|| config.resolve_profile_name(None));

    let api_base_url = match normalize_text_option(api_base_url) {
        Some(url) if !is_http_url(&url) => {
            return Err(CliError::Config(
                "API base URL must include http:// or https://".to_string(),
            ));
        }
        other => other,
    };

    let mut entry = config.profile(&name).cloned().unwrap_or_default();
    if api_base_url.is_some() {
        entry.api_base_url = api_base_url;
    }
    config.upsert_profile(&name, entry);
    if activate || config.active_profile.is_none() {
        config.active_profile = Some(name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Profile '{name}' saved to {}", path.display());
    Ok(())
}

pub fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(global_profile);

    println!("profile: {name}");
    match config.resolve_api_base_url(&name) {
        Some(url) => println!("api_base_url: {url}"),
        None => println!("api_base_url: (not configured)"),
    }
    let token = crate::auth::load_token(&name)?;
    println!(
        "token: {}",
        if token.is_some() {
            "stored"
        } else {
            "not stored"
        }
    );
    Ok(())
}

pub fn run_config_use(profile: &str) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let Some(name) = normalize_profile_name(Some(profile)) else {
        return Err(CliError::Config("profile name must not be empty".to_string()));
    };
    if config.profile(&name).is_none() {
        return Err(CliError::Config(format!(
            "unknown profile '{name}'; run `curio config init --profile {name}` first"
        )));
    }

    config.active_profile = Some(name.clone());
    config.save().map_err(CliError::Config)?;
    println!("Active profile: {name}");
    Ok(())
}
