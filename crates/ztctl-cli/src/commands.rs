//! Command execution

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;
use ztctl_api::{Operations, ViewOptions, ZtClient, ZtClientBuilder};
use ztctl_core::config::ZeroTierConfig;
use ztctl_core::dumps;

use crate::args::{Cli, Commands, MemberCommands, NetCommands};

/// Run the selected command, writing results to `out`.
pub async fn execute_command<W: Write>(cli: &Cli, config: &ZeroTierConfig, mut out: W) -> Result<()> {
    let view = ViewOptions::new(cli.format.as_str()).with_verbose(cli.verbose);

    if let Commands::Info = cli.command {
        writeln!(out, "{}", dumps(&config.summary(), &view.format)?)?;
        return Ok(());
    }

    let client = build_client(config)?;
    let mut ops = Operations::new(&client, view, out);

    match &cli.command {
        Commands::Info => {}
        Commands::User => ops.dump_user_record(config.uid.as_deref()).await?,
        Commands::Net { command } => match command {
            NetCommands::List => ops.list_networks().await?,
            NetCommands::Create(settings) => ops.create_network(&settings.to_post()).await?,
            NetCommands::Set { nid, settings } => {
                ops.set_network(nid, &settings.to_post()).await?;
            }
            NetCommands::Del { nid } => ops.delete_network(nid).await?,
        },
        Commands::Member { command } => match command {
            MemberCommands::List { nid } => ops.list_members(nid.as_deref()).await?,
            MemberCommands::Set { nid, mid, settings } => {
                ops.set_member(nid, mid, &settings.to_post()).await?;
            }
            MemberCommands::Del { nid, mid } => ops.delete_member(nid, mid).await?,
        },
    }

    ops.into_output().flush()?;
    Ok(())
}

fn build_client(config: &ZeroTierConfig) -> Result<ZtClient> {
    let token = config.resolve_token()?;
    let client = ZtClientBuilder::new(config.url.as_str(), token)
        .with_http_config(config.http_config())
        .build()
        .with_context(|| format!("failed to set up client for {}", config.url))?;

    debug!(url = client.base_url(), timeout = ?client.timeout(), "client ready");
    Ok(client)
}
