use crate::config::types::{Config, FileConfig, OutputConfig, Overrides};
use crate::config::validation::validate;
use crate::index::{default_keys, parse_keys};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads and parses a TOML configuration file without validating it
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - The parsed file; absent sections hold defaults
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)?;
    Ok(file_config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup and recorded in the crawl report so a word list can be
/// traced back to the settings that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Merges a parsed config file with command-line overrides and validates
/// the result
///
/// Overrides always win. The dictionary must come from one of the two.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Config, ConfigError> {
    let dictionary = overrides.dictionary.or(file.dictionary).ok_or_else(|| {
        ConfigError::Validation(
            "no dictionary selected; pass --dictionary or set `dictionary` in the config file"
                .to_string(),
        )
    })?;

    let keys = match overrides.keys.as_deref().or(file.keys.as_deref()) {
        Some(list) => parse_keys(list)?,
        None => default_keys(),
    };

    let mut crawler = file.crawler;
    if let Some(base_url) = overrides.base_url {
        crawler.base_url = base_url;
    }
    if let Some(delay) = overrides.min_delay_secs {
        crawler.min_delay_secs = delay;
    }

    let path = overrides
        .output
        .or(file.output.path)
        .unwrap_or_else(|| dictionary.default_output_path());

    let config = Config {
        dictionary,
        keys,
        crawler,
        user_agent: file.user_agent,
        selectors: file.selectors,
        output: OutputConfig { path },
        config_hash: None,
    };

    validate(&config)?;

    Ok(config)
}

/// Loads the effective configuration
///
/// When `path` is given the file is parsed and hashed; otherwise defaults
/// are used. Overrides are then applied and the result validated.
///
/// # Example
///
/// ```no_run
/// use lexicon_harvest::config::{load_config, Dictionary, Overrides};
/// use std::path::Path;
///
/// let overrides = Overrides {
///     dictionary: Some(Dictionary::Medical),
///     ..Default::default()
/// };
/// let config = load_config(Some(Path::new("harvest.toml")), overrides).unwrap();
/// println!("Crawling {} keys", config.keys.len());
/// ```
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<Config, ConfigError> {
    match path {
        Some(path) => {
            let file = load_file_config(path)?;
            let hash = compute_config_hash(path)?;
            let mut config = resolve(file, overrides)?;
            config.config_hash = Some(hash);
            Ok(config)
        }
        None => resolve(FileConfig::default(), overrides),
    }
}
