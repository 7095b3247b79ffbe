use crate::error::BloxorzError;
use crate::search::SearchMethod;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub level: LevelConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct LevelConfig {
    #[serde(default = "default_stages_dir")]
    pub stages_dir: PathBuf,
    #[serde(default = "default_stage")]
    pub stage: u32,
    /// Explicit level file; takes precedence over `stage`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_method")]
    pub method: SearchMethod,
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_action_log")]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
}

// Default values
fn default_stages_dir() -> PathBuf { PathBuf::from("stages") }
fn default_stage() -> u32 { 1 }
fn default_method() -> SearchMethod { SearchMethod::BreadthFirst }
fn default_cell_size() -> f32 { 40.0 }
fn default_bg_r() -> u8 { 20 }
fn default_bg_g() -> u8 { 24 }
fn default_bg_b() -> u8 { 36 }
fn default_enable_action_log() -> bool { true }
fn default_action_log_path() -> String { "action_log.json".to_string() }

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            stages_dir: default_stages_dir(),
            stage: default_stage(),
            path: None,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            trace: false,
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_action_log: default_enable_action_log(),
            action_log_path: default_action_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            solver: SolverConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration text
    pub fn from_toml(contents: &str) -> Result<Self, BloxorzError> {
        toml::from_str(contents).map_err(|e| BloxorzError::Config(e.to_string()))
    }

    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => match Config::from_toml(&contents) {
                Ok(config) => {
                    println!("Loaded configuration from config.toml");
                    config
                }
                Err(e) => {
                    eprintln!("Warning: Failed to parse config.toml: {}", e);
                    eprintln!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                println!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }

    /// Level file selected by this configuration
    pub fn level_path(&self) -> PathBuf {
        match &self.level.path {
            Some(path) => path.clone(),
            None => crate::level::Level::stage_path(&self.level.stages_dir, self.level.stage),
        }
    }
}
