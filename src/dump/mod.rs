// Export-plan synthesis: turn statement facts into mysqldump directives

mod filter_splitter;
mod plan;

pub use filter_splitter::{filter_where_for_table, strip_table_prefixes};
pub use plan::DumpPlanGenerator;

use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DATABASE: &str = "database_name";
pub const DEFAULT_KEY_COLUMN: &str = "id";
pub const DEFAULT_TEMP_DIR: &str = "/tmp";

/// Connection flags shared by the generated `mysql` and `mysqldump` commands.
///
/// Every value is trimmed on the way in; a value that trims to nothing is
/// treated as not configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    host: Option<String>,
    ip: Option<String>,
    user: Option<String>,
    password: Option<String>,
    database: String,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        ConnectionOptions {
            host: None,
            ip: None,
            user: None,
            password: None,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl AsRef<str>) -> Self {
        self.host = configured(host.as_ref());
        self
    }

    /// Takes precedence over the host name when both are set
    pub fn with_ip(mut self, ip: impl AsRef<str>) -> Self {
        self.ip = configured(ip.as_ref());
        self
    }

    pub fn with_user(mut self, user: impl AsRef<str>) -> Self {
        self.user = configured(user.as_ref());
        self
    }

    pub fn with_password(mut self, password: impl AsRef<str>) -> Self {
        self.password = configured(password.as_ref());
        self
    }

    /// A blank database name keeps the default
    pub fn with_database(mut self, database: impl AsRef<str>) -> Self {
        if let Some(database) = configured(database.as_ref()) {
            self.database = database;
        }
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// The server to connect to: the IP address if given, else the host
    pub fn target(&self) -> Option<&str> {
        self.ip.as_deref().or(self.host.as_deref())
    }

    /// Render as space-prefixed flags: ` -h <target> -u <user> --password=<password>`
    pub fn render(&self) -> String {
        let mut opts = String::new();
        if let Some(target) = self.target() {
            opts.push_str(" -h ");
            opts.push_str(target);
        }
        if let Some(user) = &self.user {
            opts.push_str(" -u ");
            opts.push_str(user);
        }
        if let Some(password) = &self.password {
            opts.push_str(" --password=");
            opts.push_str(password);
        }
        opts
    }
}

fn configured(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Everything the plan generator needs besides the facts themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSettings {
    pub connection: ConnectionOptions,
    /// Row identifier selected by the exact-rows helper
    pub key_column: String,
    /// Where the helper writes its identifier file
    pub temp_dir: PathBuf,
}

impl Default for DumpSettings {
    fn default() -> Self {
        DumpSettings {
            connection: ConnectionOptions::default(),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
        }
    }
}

/// One line of an export plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpLine {
    /// A runnable `mysqldump` command
    Directive(String),
    /// Commentary, printed as a shell comment
    Note(String),
}

impl DumpLine {
    pub fn note(text: impl Into<String>) -> Self {
        DumpLine::Note(text.into())
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, DumpLine::Directive(_))
    }
}

impl fmt::Display for DumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpLine::Directive(command) => f.write_str(command),
            DumpLine::Note(text) if text.is_empty() => f.write_str("#"),
            DumpLine::Note(text) => write!(f, "# {text}"),
        }
    }
}
