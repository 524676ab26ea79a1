use std::path::PathBuf;

#[derive(Debug, Clone, clap::Args)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "FLICK_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db or similar, default is sqlite://[data-dir]/flick.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "FLICK_DATA_DIR",
        help = "Data directory (database etc.), default is system default like ~/.local/share/flick",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "FLICK_DB_MAX_CONNECTIONS",
        default_value_t = 25,
        help = "Maximum number of open connections in database pool"
    )]
    pub db_max_connections: u32,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("flick"))
        .unwrap_or_else(|| PathBuf::from("flick"))
        .to_string_lossy()
        .to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// True when the database lives in the data directory.
    pub fn uses_data_dir(&self) -> bool {
        self.database_url.is_none()
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/flick.db", self.data_dir))
    }
}
