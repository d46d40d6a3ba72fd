// Priority: CLI args > Environment variables > Config file > Defaults

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::theme::Theme;

pub const DEFAULT_API_BASE_URL: &str = "https://pokebuildapi.fr/api/v1";

/// dexterm - terminal catalog viewer
///
/// Browse creatures from a catalog REST API, filter and sort them, and keep
/// a local list of favorites.
#[derive(Parser, Debug, Default)]
#[command(name = "dexterm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal catalog viewer", long_about = None)]
pub struct CliArgs {
    /// Catalog API base URL
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Records scanned when filtering by generation (1-2000)
    #[arg(long, env = "GENERATION_CAP")]
    pub generation_cap: Option<u32>,

    /// Records loaded on the home screen (1-2000)
    #[arg(long, env = "HOME_LIMIT")]
    pub home_limit: Option<u32>,

    /// Cards per "load more" page (1-200)
    #[arg(long, env = "PAGE_SIZE")]
    pub page_size: Option<usize>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord or amber
    #[arg(long, env = "THEME")]
    pub theme: Option<String>,

    /// Path to the SQLite file holding the favorites slot
    #[arg(long, env = "FAVORITES_DB_PATH")]
    pub favorites_db_path: Option<PathBuf>,

    /// Where log records are written
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Optional config file path (TOML format)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Start route, e.g. `dexterm://types/Feu` or `/favorites`
    pub route: Option<String>,
}

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub view: ViewSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub generation_cap: Option<u32>,
    pub home_limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewSection {
    pub page_size: Option<usize>,
    pub render_fps: Option<u32>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub favorites_db_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub http_timeout_ms: u64,
    pub generation_cap: u32,
    pub home_limit: u32,
    pub page_size: usize,
    pub render_fps: u32,
    pub theme: Theme,
    pub favorites_db_path: PathBuf,
    pub log_file: PathBuf,
    pub start_route: Option<String>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args, environment variables and the optional
/// config file.
pub fn load() -> Result<Config> {
    let args = CliArgs::parse();
    let file = match &args.config_file {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    resolve(args, file)
}

/// Merge parsed arguments over a config file and defaults.
pub fn resolve(args: CliArgs, file: ConfigFile) -> Result<Config> {
    let api_base_url = args
        .api_base_url
        .or(file.api.base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    validate_url(&api_base_url, "API_BASE_URL")?;

    let http_timeout_ms = args.http_timeout_ms.or(file.api.timeout_ms).unwrap_or(8000);
    let http_timeout_ms = validate_in_range(http_timeout_ms, 1000, 60000, "HTTP_TIMEOUT_MS")?;

    let generation_cap = args
        .generation_cap
        .or(file.api.generation_cap)
        .unwrap_or(crate::api::GENERATION_CAP);
    let generation_cap = validate_in_range(generation_cap, 1, 2000, "GENERATION_CAP")?;

    let home_limit = args.home_limit.or(file.api.home_limit).unwrap_or(400);
    let home_limit = validate_in_range(home_limit, 1, 2000, "HOME_LIMIT")?;

    let page_size = args
        .page_size
        .or(file.view.page_size)
        .unwrap_or(crate::view::DEFAULT_PAGE_SIZE);
    let page_size = validate_in_range(page_size, 1, 200, "PAGE_SIZE")?;

    let render_fps = args.render_fps.or(file.view.render_fps).unwrap_or(30);
    let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

    let theme = match args.theme.or(file.view.theme) {
        Some(name) => Theme::from_str(&name).map_err(|e| anyhow!(e))?,
        None => Theme::default(),
    };

    Ok(Config {
        api_base_url,
        http_timeout_ms,
        generation_cap,
        home_limit,
        page_size,
        render_fps,
        theme,
        favorites_db_path: args
            .favorites_db_path
            .or(file.storage.favorites_db_path)
            .unwrap_or_else(|| PathBuf::from("./dexterm_favorites.db")),
        log_file: args
            .log_file
            .or(file.storage.log_file)
            .unwrap_or_else(|| PathBuf::from("dexterm.log")),
        start_route: args.route,
    })
}

impl Config {
    pub fn log_summary(&self) {
        log::info!("dexterm configuration:");
        log::info!("  API: {} (timeout {}ms)", self.api_base_url, self.http_timeout_ms);
        log::info!("  Home limit: {}, generation cap: {}", self.home_limit, self.generation_cap);
        log::info!("  Page size: {}, FPS: {}, theme: {}", self.page_size, self.render_fps, self.theme);
        log::info!("  Favorites: {}", self.favorites_db_path.display());
    }
}
