use clap::{Parser, Subcommand};

/// Command-line client for the hosted Redis console API.
#[derive(Debug, Parser)]
#[command(name = "paas-console", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConsoleCommand {
    /// Sign in and remember the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password; read from stdin when neither the flag nor
        /// `PAAS_PASSWORD` is set.
        #[arg(long, env = "PAAS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the stored session.
    Whoami,
    /// Check whether a console path may be opened.
    Navigate {
        /// Console path such as `/instances/cache-1`.
        path: String,
    },
    /// List instances.
    Instances,
    /// List audit logs.
    AuditLogs {
        /// Page number, starting at 1.
        #[arg(long)]
        page: Option<u32>,
        /// Action type such as `create` or `delete`.
        #[arg(long = "type", value_name = "TYPE")]
        action_type: Option<String>,
        /// Only show actions performed by admins.
        #[arg(long, default_value_t = false)]
        admin_only: bool,
    },
    /// List service logs across instances.
    ServiceLogs {
        /// Page number, starting at 1.
        #[arg(long)]
        page: Option<u32>,
        /// Instance name.
        #[arg(long)]
        instance: Option<String>,
        /// Instance namespace.
        #[arg(long)]
        namespace: Option<String>,
    },
    /// List service logs of one instance.
    InstanceLogs {
        /// Instance identifier.
        id: String,
        /// Page number, starting at 1.
        #[arg(long)]
        page: Option<u32>,
        /// Instance namespace.
        #[arg(long)]
        namespace: Option<String>,
    },
}
