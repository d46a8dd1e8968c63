use serde::{Deserialize, Serialize};
use std::fs;
use xidach_engine::rules::DEFAULT_RULE_ID;
use xidach_table::TableSettings;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub max_bet: u64,
    pub min_deal: u64,
    pub turn_timeout_secs: u64,
    pub initial_balance: i64,
    pub rule: String,
    /// SQLite database path; the in-memory store is used when unset
    pub db: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub max_bet: ValueSource,
    pub min_deal: ValueSource,
    pub turn_timeout_secs: ValueSource,
    pub initial_balance: ValueSource,
    pub rule: ValueSource,
    pub db: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            max_bet: ValueSource::Default,
            min_deal: ValueSource::Default,
            turn_timeout_secs: ValueSource::Default,
            initial_balance: ValueSource::Default,
            rule: ValueSource::Default,
            db: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let table = TableSettings::default();
        Self {
            max_bet: table.max_bet,
            min_deal: table.min_deal,
            turn_timeout_secs: table.turn_timeout_secs,
            initial_balance: table.initial_balance,
            rule: DEFAULT_RULE_ID.into(),
            db: None,
        }
    }
}

impl Config {
    pub fn to_settings(&self) -> TableSettings {
        TableSettings {
            max_bet: self.max_bet,
            min_deal: self.min_deal,
            turn_timeout_secs: self.turn_timeout_secs,
            initial_balance: self.initial_balance,
            default_rule_id: self.rule.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("XIDACH_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.max_bet {
            cfg.max_bet = v;
            sources.max_bet = ValueSource::File;
        }
        if let Some(v) = f.min_deal {
            cfg.min_deal = v;
            sources.min_deal = ValueSource::File;
        }
        if let Some(v) = f.turn_timeout_secs {
            cfg.turn_timeout_secs = v;
            sources.turn_timeout_secs = ValueSource::File;
        }
        if let Some(v) = f.initial_balance {
            cfg.initial_balance = v;
            sources.initial_balance = ValueSource::File;
        }
        if let Some(v) = f.rule {
            cfg.rule = v;
            sources.rule = ValueSource::File;
        }
        if let Some(v) = f.db {
            cfg.db = Some(v);
            sources.db = ValueSource::File;
        }
    }

    if let Ok(v) = std::env::var("XIDACH_MAX_BET")
        && !v.is_empty()
    {
        cfg.max_bet = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid XIDACH_MAX_BET".into()))?;
        sources.max_bet = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("XIDACH_MIN_DEAL")
        && !v.is_empty()
    {
        cfg.min_deal = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid XIDACH_MIN_DEAL".into()))?;
        sources.min_deal = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("XIDACH_TIMEOUT_SECS")
        && !v.is_empty()
    {
        cfg.turn_timeout_secs = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid XIDACH_TIMEOUT_SECS".into()))?;
        sources.turn_timeout_secs = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("XIDACH_INITIAL_BALANCE")
        && !v.is_empty()
    {
        cfg.initial_balance = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid XIDACH_INITIAL_BALANCE".into()))?;
        sources.initial_balance = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("XIDACH_RULE")
        && !v.is_empty()
    {
        cfg.rule = v;
        sources.rule = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("XIDACH_DB")
        && !v.is_empty()
    {
        cfg.db = Some(v);
        sources.db = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    max_bet: Option<u64>,
    #[serde(default)]
    min_deal: Option<u64>,
    #[serde(default)]
    turn_timeout_secs: Option<u64>,
    #[serde(default)]
    initial_balance: Option<i64>,
    #[serde(default)]
    rule: Option<String>,
    #[serde(default)]
    db: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.to_settings()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))
}
