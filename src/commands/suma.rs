//! SUSE Manager commands
//!
//! Each invocation logs in once and reuses the session cookie for every
//! call it makes. Workflow failures are reported with the HTTP status
//! when the server returned one.

use anyhow::{Context as _, Result, bail};
use sumakit::{CleanupType, Client, Credentials, NewUser, SessionCookie};

use crate::Context;
use crate::cli::{CleanupArg, MembershipArgs, SumaArgs, SumaCommand};
use crate::commands::notify;

/// Run a SUSE Manager command
pub fn run(ctx: &Context, args: SumaArgs) -> Result<()> {
    let client = Client::new_verbose(&args.connection.url, ctx.raw_bodies());
    let credentials = Credentials::new(&args.connection.user, &args.connection.password);
    let session = login(&client, &credentials, &args.connection.url)?;

    match args.command {
        SumaCommand::Login => {
            notify(ctx, &format!("Logged in to {}", args.connection.url));
            Ok(())
        }
        SumaCommand::SystemId { hostname } => system_id(&client, &session, &hostname),
        SumaCommand::SystemIp { hostname } => system_ip(&client, &session, &hostname),
        SumaCommand::AddSystem(m) => add_system(ctx, &client, &session, &m),
        SumaCommand::RemoveSystem(m) => remove_system(ctx, &client, &session, &m),
        SumaCommand::DeleteSystem {
            hostname,
            network,
            cleanup,
        } => delete_system(ctx, &client, &session, &hostname, &network, cleanup.into()),
        SumaCommand::RemoveGroup { group } => remove_group(ctx, &client, &session, &group),
        SumaCommand::AddUser {
            login,
            user_password,
            first_name,
            last_name,
            email,
        } => {
            let mut user = NewUser::new(login, user_password).email(email);
            if let Some(first) = first_name {
                user = user.first_name(first);
            }
            if let Some(last) = last_name {
                user = user.last_name(last);
            }
            add_user(ctx, &client, &session, &user)
        }
        SumaCommand::RemoveUser { login } => remove_user(ctx, &client, &session, &login),
    }
}

impl From<CleanupArg> for CleanupType {
    fn from(arg: CleanupArg) -> Self {
        match arg {
            CleanupArg::FailOnCleanupErr => CleanupType::FailOnCleanupErr,
            CleanupArg::NoCleanup => CleanupType::NoCleanup,
            CleanupArg::ForceDelete => CleanupType::ForceDelete,
        }
    }
}

fn login(client: &Client, credentials: &Credentials, url: &str) -> Result<SessionCookie> {
    let session = client
        .login(credentials)
        .with_context(|| format!("Failed to log in to {url}"))?;

    if session.is_empty() {
        bail!("Login to {url} returned no session cookie");
    }
    Ok(session)
}

// ============================================================================
// Lookups
// ============================================================================

fn system_id(client: &Client, session: &SessionCookie, hostname: &str) -> Result<()> {
    let id = client
        .system_id(session, hostname)
        .with_context(|| format!("Failed to look up {hostname}"))?;
    println!("{id}");
    Ok(())
}

fn system_ip(client: &Client, session: &SessionCookie, hostname: &str) -> Result<()> {
    let id = client
        .system_id(session, hostname)
        .with_context(|| format!("Failed to look up {hostname}"))?;
    let ip = client
        .system_ip(session, id)
        .with_context(|| format!("Failed to read the network of {hostname}"))?;
    println!("{ip}");
    Ok(())
}

// ============================================================================
// Workflows
// ============================================================================

fn add_system(
    ctx: &Context,
    client: &Client,
    session: &SessionCookie,
    m: &MembershipArgs,
) -> Result<()> {
    let status = client
        .add_system_to_group(session, &m.hostname, &m.group, &m.network)
        .map_err(|e| failure(&e))
        .with_context(|| format!("Failed to add {} to {}", m.hostname, m.group))?;
    report(ctx, &format!("Added {} to {}", m.hostname, m.group), status);
    Ok(())
}

fn remove_system(
    ctx: &Context,
    client: &Client,
    session: &SessionCookie,
    m: &MembershipArgs,
) -> Result<()> {
    let status = client
        .remove_system_from_group(session, &m.hostname, &m.group, &m.network)
        .map_err(|e| failure(&e))
        .with_context(|| format!("Failed to remove {} from {}", m.hostname, m.group))?;
    report(ctx, &format!("Removed {} from {}", m.hostname, m.group), status);
    Ok(())
}

fn delete_system(
    ctx: &Context,
    client: &Client,
    session: &SessionCookie,
    hostname: &str,
    network: &str,
    cleanup: CleanupType,
) -> Result<()> {
    let status = client
        .delete_system(session, hostname, network, cleanup)
        .map_err(|e| failure(&e))
        .with_context(|| format!("Failed to delete {hostname}"))?;
    report(ctx, &format!("Deleted {hostname} ({cleanup})"), status);
    Ok(())
}

fn remove_group(ctx: &Context, client: &Client, session: &SessionCookie, group: &str) -> Result<()> {
    let status = client
        .remove_system_group(session, group)
        .map_err(|e| failure(&e))
        .with_context(|| format!("Failed to remove group {group}"))?;
    report(ctx, &format!("Group {group} is gone"), status);
    Ok(())
}

fn add_user(ctx: &Context, client: &Client, session: &SessionCookie, user: &NewUser) -> Result<()> {
    let status = client
        .add_user(session, user)
        .map_err(|e| failure(&e))
        .with_context(|| format!("Failed to add user {}", user.login))?;
    report(ctx, &format!("User {} is present", user.login), status);
    Ok(())
}

fn remove_user(ctx: &Context, client: &Client, session: &SessionCookie, login: &str) -> Result<()> {
    client
        .remove_user(session, login)
        .map_err(|e| failure(&e))
        .with_context(|| format!("Failed to remove user {login}"))?;
    notify(ctx, &format!("User {login} and its group are gone"));
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn report(ctx: &Context, msg: &str, status: u16) {
    notify(ctx, &format!("{msg} (HTTP {status})"));
}

/// Turn a workflow error into a message that carries its category advice
fn failure(err: &sumakit::Error) -> anyhow::Error {
    let mut msg = err.to_string();
    if let Some(status) = err.status() {
        msg = format!("{msg} [HTTP {status}]");
    }
    anyhow::anyhow!("{msg}\n  hint: {}", err.category().advice())
}
