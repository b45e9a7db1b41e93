use clap::{Parser, Subcommand};

/// Command-line interface definition for rTaskMeter
/// Task time-tracking and meter account service backed by SQLite and JSON files
#[derive(Parser)]
#[command(
    name = "rtaskmeter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track task intervals and meter accounts, over HTTP or from the command line",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the directory holding accounts.json and the readings logs
    #[arg(global = true, long = "data-dir")]
    pub data_dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration, database and data directory
    Init,

    /// Run the HTTP API
    Serve {
        /// Address to bind (default from config)
        #[arg(long = "host")]
        host: Option<String>,

        /// Port to listen on (default from config or ACC_API_PORT)
        #[arg(long = "port")]
        port: Option<u16>,
    },

    /// Start tracking a task for a user
    Track {
        /// Numeric user id
        user_id: i64,
    },

    /// Stop a running task
    Stop {
        /// Task id returned by `track`
        id: i64,
    },

    /// Show the time each task of a user took on a given day
    Times {
        /// Numeric user id
        user_id: i64,

        /// Day to inspect (YYYY-MM-DD, default today)
        #[arg(long = "date")]
        date: Option<String>,
    },

    /// Query the meter account store
    Acc {
        #[command(subcommand)]
        action: AccCommands,
    },

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum AccCommands {
    /// Print every account record
    List,

    /// Print the first account matching one field
    Get {
        #[arg(long = "info", conflicts_with_all = ["hepek", "user"])]
        info: Option<String>,

        #[arg(long = "hepek", conflicts_with = "user")]
        hepek: Option<String>,

        #[arg(long = "user")]
        user: Option<String>,
    },

    /// Print the stored meter readings of an account
    Readings {
        info: String,
        hepek: String,
    },
}
