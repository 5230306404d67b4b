//! meshStack building block commands

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use meshkit::{AccessToken, ApiKey, Client};
use std::fs;
use std::path::Path;

use crate::Context;
use crate::cli::{MeshArgs, MeshCommand};
use crate::commands::notify;
use crate::ui;

/// Run a meshStack command
pub fn run(ctx: &Context, args: MeshArgs) -> Result<()> {
    let client = Client::new(&args.connection.url).verbose(ctx.raw_bodies());
    let key = ApiKey::new(&args.connection.client_id, &args.connection.client_secret);
    let token = client
        .login(&key)
        .with_context(|| format!("Failed to log in to {}", args.connection.url))?;

    match args.command {
        MeshCommand::Login => {
            notify(ctx, &format!("Logged in to {}", args.connection.url));
            Ok(())
        }
        MeshCommand::List { project } => list(ctx, &client, &token, &project),
        MeshCommand::Find { project, name } => find(&client, &token, &project, &name),
        MeshCommand::Status { uuid } => status(&client, &token, &uuid),
        MeshCommand::Create { payload } => create(ctx, &client, &token, &payload),
        MeshCommand::Delete { uuid } => delete(ctx, &client, &token, &uuid),
    }
}

fn list(ctx: &Context, client: &Client, token: &AccessToken, project: &str) -> Result<()> {
    let blocks = client
        .list_building_blocks(token, project)
        .with_context(|| format!("Failed to list building blocks of {project}"))?;

    if !ctx.quiet {
        ui::header(&format!("Building blocks in {project}"));
    }
    if blocks.is_empty() {
        ui::dim("(none)");
        return Ok(());
    }

    for block in &blocks {
        println!("  {}  {}", block.uuid.dimmed(), block.name);
    }
    Ok(())
}

fn find(client: &Client, token: &AccessToken, project: &str, name: &str) -> Result<()> {
    match client.find_building_block(token, project, name) {
        Ok(block) => {
            println!("{}", block.uuid);
            Ok(())
        }
        Err(e) if e.is_not_found() => bail!("No building block named {name} in {project}"),
        Err(e) => Err(e).with_context(|| format!("Failed to search {project}")),
    }
}

fn status(client: &Client, token: &AccessToken, uuid: &str) -> Result<()> {
    let status = client
        .building_block_status(token, uuid)
        .with_context(|| format!("Failed to read the status of {uuid}"))?;

    let label = if !status.is_terminal() {
        status.as_str().yellow()
    } else if status == meshkit::BuildingBlockStatus::Succeeded {
        status.as_str().green()
    } else {
        status.as_str().red()
    };
    println!("{label}");
    Ok(())
}

fn create(ctx: &Context, client: &Client, token: &AccessToken, path: &Path) -> Result<()> {
    let payload = read_payload(path)?;
    let uuid = client
        .create_building_block(token, &payload)
        .context("Failed to create building block")?;

    if !notify(ctx, &format!("Created building block {uuid}")) {
        println!("{uuid}");
    }
    Ok(())
}

fn delete(ctx: &Context, client: &Client, token: &AccessToken, uuid: &str) -> Result<()> {
    client
        .delete_building_block(token, uuid)
        .with_context(|| format!("Failed to delete building block {uuid}"))?;

    notify(ctx, &format!("Deleted building block {uuid}"));
    Ok(())
}

/// Read a payload file and make sure it holds JSON before it is sent
fn read_payload(path: &Path) -> Result<Vec<u8>> {
    let payload =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice::<serde_json::Value>(&payload)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(payload)
}
