use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "appctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Manage SUSE Manager systems and meshStack building blocks", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-vv also logs raw API bodies)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// SUSE Manager systems, groups and users
    Suma(SumaArgs),

    /// meshStack building blocks
    Mesh(MeshArgs),

    /// Network membership checks
    #[command(subcommand)]
    Net(NetCommand),

    /// Show environment configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// SUSE Manager
// ============================================================================

#[derive(Args)]
pub struct SumaArgs {
    #[command(flatten)]
    pub connection: SumaConnection,

    #[command(subcommand)]
    pub command: SumaCommand,
}

#[derive(Args)]
pub struct SumaConnection {
    /// SUSE Manager server URL (e.g. https://suma.example.com)
    #[arg(long, env = "SUMA_URL")]
    pub url: String,

    /// API login
    #[arg(long, env = "SUMA_USER")]
    pub user: String,

    /// API password
    #[arg(long, env = "SUMA_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum SumaCommand {
    /// Check that the credentials yield a session
    Login,

    /// Print the system id registered for a hostname
    SystemId {
        /// Hostname of the system
        hostname: String,
    },

    /// Print the IP address of a system
    SystemIp {
        /// Hostname of the system
        hostname: String,
    },

    /// Add a system to a group (only if it lives in the network)
    AddSystem(MembershipArgs),

    /// Remove a system from a group (only if it lives in the network)
    RemoveSystem(MembershipArgs),

    /// Delete a system (only if it lives in the network)
    DeleteSystem {
        /// Hostname of the system
        hostname: String,

        /// Network the system must belong to (192.168.1.0 or 10.1.0.0/16)
        #[arg(short, long)]
        network: String,

        /// What to do with the system's local state
        #[arg(long, value_enum, default_value = "fail-on-cleanup-err")]
        cleanup: CleanupArg,
    },

    /// Delete a system group if it exists
    RemoveGroup {
        /// Group name
        group: String,
    },

    /// Create a user unless it exists
    AddUser {
        /// Login of the new user
        login: String,

        /// Initial password of the new user
        #[arg(long, env = "SUMA_NEW_USER_PASSWORD", hide_env_values = true)]
        user_password: String,

        /// Given name (defaults to the login)
        #[arg(long)]
        first_name: Option<String>,

        /// Family name (defaults to the login)
        #[arg(long)]
        last_name: Option<String>,

        /// Contact address
        #[arg(long, default_value = "")]
        email: String,
    },

    /// Remove a user and the system group named after it
    RemoveUser {
        /// Login of the user
        login: String,
    },
}

#[derive(Args)]
pub struct MembershipArgs {
    /// Hostname of the system
    pub hostname: String,

    /// System group name
    #[arg(short, long)]
    pub group: String,

    /// Network the system must belong to (192.168.1.0 or 10.1.0.0/16)
    #[arg(short, long)]
    pub network: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CleanupArg {
    FailOnCleanupErr,
    NoCleanup,
    ForceDelete,
}

// ============================================================================
// meshStack
// ============================================================================

#[derive(Args)]
pub struct MeshArgs {
    #[command(flatten)]
    pub connection: MeshConnection,

    #[command(subcommand)]
    pub command: MeshCommand,
}

#[derive(Args)]
pub struct MeshConnection {
    /// meshStack API URL
    #[arg(long, env = "MESH_URL")]
    pub url: String,

    /// API key client id
    #[arg(long, env = "MESH_CLIENT_ID")]
    pub client_id: String,

    /// API key client secret
    #[arg(long, env = "MESH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
}

#[derive(Subcommand)]
pub enum MeshCommand {
    /// Check that the API key yields a token
    Login,

    /// List the building blocks of a project
    List {
        /// Project identifier
        project: String,
    },

    /// Find a building block by display name
    Find {
        /// Project identifier
        project: String,

        /// Display name of the building block
        name: String,
    },

    /// Show the status of a building block
    Status {
        /// Building block UUID
        uuid: String,
    },

    /// Create a building block from a JSON payload file
    Create {
        /// Path to the payload
        payload: PathBuf,
    },

    /// Delete a building block
    Delete {
        /// Building block UUID
        uuid: String,
    },
}

// ============================================================================
// Network
// ============================================================================

#[derive(Subcommand)]
pub enum NetCommand {
    /// Check whether an IP lies in a network
    Check {
        /// IP address
        ip: String,

        /// Network address (classful) or CIDR
        network: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_system() {
        let cli = Cli::try_parse_from([
            "appctl",
            "suma",
            "--url",
            "https://suma.example.com",
            "--user",
            "admin",
            "--password",
            "pw",
            "add-system",
            "web01",
            "--group",
            "web",
            "--network",
            "192.168.1.0",
        ])
        .unwrap();

        let Command::Suma(args) = cli.command else {
            panic!("expected suma command");
        };
        assert_eq!(args.connection.url, "https://suma.example.com");
        let SumaCommand::AddSystem(m) = args.command else {
            panic!("expected add-system");
        };
        assert_eq!(m.hostname, "web01");
        assert_eq!(m.group, "web");
        assert_eq!(m.network, "192.168.1.0");
    }

    #[test]
    fn test_parse_net_check() {
        let cli = Cli::try_parse_from(["appctl", "-vv", "net", "check", "10.0.0.1", "10.0.0.0"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Net(NetCommand::Check { .. })));
    }
}
