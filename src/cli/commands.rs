use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Admin console and display board for a take-a-number counter service
#[derive(Parser, Debug)]
#[command(name = "queue-desk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL (overrides configuration)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// API key sent as the APIKey header (overrides configuration)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH", env = "QUEUE_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in as an admin and store the session token
    Login {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Password; prompted for when omitted
        #[arg(long, env = "QUEUE_DESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Manage counters
    Counter {
        #[command(subcommand)]
        command: CounterCommands,
    },

    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Claim, release and serve queue numbers
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },

    /// Show the public display board
    Board {
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Refresh period in seconds (defaults to display.poll_interval_secs)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CounterCommands {
    /// List counters
    List {
        /// Include soft-deleted counters
        #[arg(long)]
        all: bool,

        /// Write CSV to stdout
        #[arg(long)]
        csv: bool,
    },

    /// Show one counter
    Show { id: u64 },

    /// Create a counter
    Create {
        name: String,

        /// Maximum number of queued tickets
        #[arg(short, long)]
        max_queue: u32,

        /// Create the counter inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Update a counter
    #[command(group(ArgGroup::new("active_flag").args(["activate", "deactivate"])))]
    Update {
        id: u64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        max_queue: Option<u32>,

        #[arg(long)]
        activate: bool,

        #[arg(long)]
        deactivate: bool,
    },

    /// Delete a counter
    Delete { id: u64 },

    /// Summary of active counters and the number each is serving
    Dashboard,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List admin accounts
    List,

    /// Show one admin account
    Show { id: u64 },

    /// Create an admin account
    Create {
        username: String,

        #[arg(short, long)]
        email: String,

        /// Password; prompted for when omitted
        #[arg(long, env = "QUEUE_DESK_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Update an admin account
    Update {
        id: u64,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Prompt for a new password
        #[arg(long)]
        change_password: bool,
    },

    /// Delete an admin account
    Delete { id: u64 },

    /// Activate or deactivate an admin account
    Toggle { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum QueueCommands {
    /// Take the next queue number
    Claim,

    /// Give back the held queue number
    Release {
        /// Counter of the ticket (defaults to the held ticket)
        #[arg(long)]
        counter: Option<u64>,

        /// Queue number to release (defaults to the held ticket)
        #[arg(long)]
        number: Option<u32>,
    },

    /// Show the queue number held by this session
    Status,

    /// Call the next queue number at a counter
    Next { counter: u64 },

    /// Skip the number currently called at a counter
    Skip { counter: u64 },

    /// Reset queue numbers
    #[command(group(ArgGroup::new("scope").required(true).args(["counter", "all"])))]
    Reset {
        /// Reset a single counter
        #[arg(long)]
        counter: Option<u64>,

        /// Reset every counter
        #[arg(long)]
        all: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Search queue tickets
    Search { query: String },

    /// Show queue statistics
    Metrics,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Show a single key
        key: Option<String>,
    },

    /// Set a key in the configuration file
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}
