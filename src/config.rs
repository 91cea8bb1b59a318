use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::dump::{
    ConnectionOptions, DEFAULT_DATABASE, DEFAULT_KEY_COLUMN, DEFAULT_TEMP_DIR, DumpSettings,
};
use crate::report::ReportFormat;
use crate::{Result, SqlFactsError};

#[derive(Parser, Debug, Clone)]
#[command(name = "sqlfacts")]
#[command(version)]
#[command(
    about = "Extract tables, columns and WHERE filters from MySQL statements and plan mysqldump exports",
    long_about = None,
    after_help = "Examples:\n  sqlfacts \"SELECT * FROM users WHERE id = 1\"\n  sqlfacts -f query.sql\n  sqlfacts dump -f query.sql -d mydb -u root -h localhost"
)]
pub struct Config {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text, env = "SQLFACTS_FORMAT", help = "Report format for the default analyze command")]
    pub format: ReportFormat,

    #[arg(long, default_value = "warn", env = "SQLFACTS_LOG_LEVEL", global = true, help = "Log filter directive, written to stderr")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print tables, columns, action and WHERE filter per statement (default)
    Analyze(AnalyzeArgs),
    /// Check SQL syntax without analyzing
    Check(InputArgs),
    /// Print mysqldump commands that back up the rows a statement touches
    #[command(disable_help_flag = true)]
    Dump(DumpArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// SQL text, may hold several `;`-separated statements
    pub sql: Option<String>,

    /// Read SQL from a file instead (wins over the positional argument)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text, env = "SQLFACTS_FORMAT")]
    pub format: ReportFormat,
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print help (`-h` is the host flag here)
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    #[arg(short = 'h', long, env = "SQLFACTS_HOST", help = "Database host")]
    pub host: Option<String>,

    #[arg(long, env = "SQLFACTS_IP", help = "Database IP (overrides host)")]
    pub ip: Option<String>,

    #[arg(short, long, env = "SQLFACTS_USER", help = "Database user")]
    pub user: Option<String>,

    #[arg(short = 'P', long, env = "SQLFACTS_PASSWORD", help = "Database password")]
    pub password: Option<String>,

    #[arg(short, long, default_value = DEFAULT_DATABASE, env = "SQLFACTS_DATABASE", help = "Database name")]
    pub database: String,

    #[arg(long, default_value = DEFAULT_KEY_COLUMN, env = "SQLFACTS_KEY_COLUMN", help = "Row identifier column used by the exact-rows helper")]
    pub key_column: String,

    #[arg(long, default_value = DEFAULT_TEMP_DIR, env = "SQLFACTS_TEMP_DIR", help = "Directory for the helper's identifier file")]
    pub temp_dir: PathBuf,
}

impl Config {
    /// Get a configuration instance with all values resolved from CLI args and environment variables
    pub fn load() -> Self {
        Config::parse()
    }

    /// The command to run; bare invocations analyze
    pub fn resolved_command(&self) -> Command {
        match &self.command {
            Some(command) => command.clone(),
            None => Command::Analyze(AnalyzeArgs {
                input: self.input.clone(),
                format: self.format,
            }),
        }
    }
}

impl InputArgs {
    /// Load the SQL text, preferring the file over the positional argument
    pub fn read_sql(&self) -> Result<String> {
        let sql = match (&self.file, &self.sql) {
            (Some(path), _) => {
                debug!("Reading SQL from {}", path.display());
                fs::read_to_string(path)?
            }
            (None, Some(sql)) => sql.clone(),
            (None, None) => return Err(SqlFactsError::MissingInput),
        };

        if sql.trim().is_empty() {
            return Err(SqlFactsError::MissingInput);
        }
        Ok(sql)
    }
}

impl ConnectionArgs {
    pub fn to_settings(&self) -> DumpSettings {
        let mut connection = ConnectionOptions::new().with_database(&self.database);
        if let Some(host) = &self.host {
            connection = connection.with_host(host);
        }
        if let Some(ip) = &self.ip {
            connection = connection.with_ip(ip);
        }
        if let Some(user) = &self.user {
            connection = connection.with_user(user);
        }
        if let Some(password) = &self.password {
            connection = connection.with_password(password);
        }

        DumpSettings {
            connection,
            key_column: self.key_column.trim().to_string(),
            temp_dir: self.temp_dir.clone(),
        }
    }
}
