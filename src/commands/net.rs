use anyhow::{Result, bail};
use sumakit::network::{is_in_network, parse_network};

use crate::Context;
use crate::cli::NetCommand;
use crate::commands::notify;

/// Run a network command
pub fn run(ctx: &Context, cmd: NetCommand) -> Result<()> {
    match cmd {
        NetCommand::Check { ip, network } => check(ctx, &ip, &network),
    }
}

fn check(ctx: &Context, ip: &str, network: &str) -> Result<()> {
    let Some(net) = parse_network(network) else {
        bail!("{network} is not a usable network");
    };

    if !is_in_network(ip, network) {
        bail!("{ip} is not in {net}");
    }

    notify(ctx, &format!("{ip} is in {net}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context {
            verbose: 0,
            quiet: true,
            config: crate::config::Config::default(),
        }
    }

    #[test]
    fn test_check_member() {
        assert!(check(&ctx(), "192.168.1.20", "192.168.1.0").is_ok());
        assert!(check(&ctx(), "10.1.2.3", "10.1.0.0/16").is_ok());
    }

    #[test]
    fn test_check_outside() {
        let err = check(&ctx(), "192.168.2.20", "192.168.1.0").unwrap_err();
        assert!(err.to_string().contains("192.168.1.0/24"));
    }

    #[test]
    fn test_check_bad_network() {
        let err = check(&ctx(), "192.168.1.20", "not-a-network").unwrap_err();
        assert!(err.to_string().contains("not a usable"));
    }
}
