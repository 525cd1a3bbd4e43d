//! Curio CLI - administer a curated quote collection
//!
//! List, search, and edit quotes against the remote collection API, run
//! bulk imports and AI tag fills under the backend's rate limits, and
//! clean up duplicates.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{AuthCommands, Cli, Commands, ConfigCommands, DedupCommands, TagsCommands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::{run_auth_login, run_auth_logout, run_auth_status};
use crate::commands::common::build_client;
use crate::commands::completions::run_completions;
use crate::commands::config::{run_config_init, run_config_show, run_config_use};
use crate::commands::dedup::{run_dedup_clean, run_dedup_scan};
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::search::run_search;
use crate::commands::tags::{run_tags_cleanup, run_tags_fill, run_tags_list};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("curio=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::List {
            limit,
            sort,
            order,
            all,
            json,
        } => {
            run_list(
                build_client(profile)?,
                limit,
                sort.to_field(),
                order.to_order(),
                all,
                json,
            )
            .await?;
        }
        Commands::Search {
            query,
            limit,
            sort,
            order,
            json,
        } => {
            run_search(
                build_client(profile)?,
                &query,
                limit,
                sort.to_field(),
                order.to_order(),
                json,
            )
            .await?;
        }
        Commands::Add { text, author, tags } => {
            run_add(build_client(profile)?, &text, &author, tags.as_deref()).await?;
        }
        Commands::Edit {
            id,
            text,
            author,
            tags,
        } => {
            run_edit(
                build_client(profile)?,
                &id,
                text.as_deref(),
                author.as_deref(),
                tags.as_deref(),
            )
            .await?;
        }
        Commands::Delete { id, yes } => {
            run_delete(build_client(profile)?, &id, yes).await?;
        }
        Commands::Import {
            file,
            batch_size,
            delay_ms,
            yes,
            retry_file,
            include_duplicates,
        } => {
            run_import(
                build_client(profile)?,
                &file,
                batch_size,
                delay_ms,
                yes,
                retry_file.as_deref(),
                include_duplicates,
            )
            .await?;
        }
        Commands::Tags { command } => match command {
            TagsCommands::List { json } => run_tags_list(build_client(profile)?, json).await?,
            TagsCommands::Cleanup { yes } => run_tags_cleanup(build_client(profile)?, yes).await?,
            TagsCommands::Fill {
                limit,
                batch_size,
                yes,
            } => run_tags_fill(build_client(profile)?, limit, batch_size, yes).await?,
        },
        Commands::Dedup { command } => match command {
            DedupCommands::Scan { json } => run_dedup_scan(build_client(profile)?, json).await?,
            DedupCommands::Clean { keep_newest, yes } => {
                run_dedup_clean(build_client(profile)?, keep_newest, yes).await?;
            }
        },
        Commands::Export { format, output } => {
            run_export(build_client(profile)?, format, output.as_deref()).await?;
        }
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Init {
                profile: name,
                api_base_url,
                activate,
            } => run_config_init(profile, name.as_deref(), api_base_url, activate)?,
            ConfigCommands::Show => run_config_show(profile)?,
            ConfigCommands::Use { profile: name } => run_config_use(&name)?,
        },
        Commands::Auth { command } => match command {
            AuthCommands::Login { token } => run_auth_login(profile, token.as_deref())?,
            AuthCommands::Logout => run_auth_logout(profile)?,
            AuthCommands::Status => run_auth_status(profile)?,
        },
    }

    Ok(())
}
