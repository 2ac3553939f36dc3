use bayan::cli::{Cli, OutputFormat};
use bayan::config::{Config, ConfigError};
use bayan::duplicates::MatchStrategy;
use clap::Parser;
use figment::providers::Serialized;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.block_size, 1024);
    assert_eq!(config.min_size, 1);
    assert_eq!(config.threads, 1);
    assert_eq!(config.output, OutputFormat::Text);
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("BAYAN_ITEST_BLOCK_SIZE", "512");
    std::env::set_var("BAYAN_ITEST_STRATEGY", "exhaustive");
    std::env::set_var("BAYAN_ITEST_RECURSIVE", "true");

    use figment::{providers::Env, Figment};
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("BAYAN_ITEST_").split("__"));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.block_size, 512);
    assert_eq!(config.strategy, MatchStrategy::Exhaustive);
    assert!(config.recursive);

    std::env::remove_var("BAYAN_ITEST_BLOCK_SIZE");
    std::env::remove_var("BAYAN_ITEST_STRATEGY");
    std::env::remove_var("BAYAN_ITEST_RECURSIVE");
}

#[test]
fn test_config_load_from_toml_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
block_size = 8192
min_size = 100
threads = 2
masks = ["*.mp3", "*.flac"]
excludes = ["/music/incoming"]
output = "csv"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.block_size, 8192);
    assert_eq!(config.min_size, 100);
    assert_eq!(config.threads, 2);
    assert_eq!(config.masks, vec!["*.mp3".to_string(), "*.flac".to_string()]);
    assert_eq!(config.excludes, vec![PathBuf::from("/music/incoming")]);
    assert_eq!(config.output, OutputFormat::Csv);
}

#[test]
fn test_config_invalid_toml_is_load_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "threads = [1, 2").unwrap();

    assert!(matches!(
        Config::load(Some(&config_path)),
        Err(ConfigError::Load(_))
    ));
}

#[test]
fn test_config_roundtrips_through_toml() {
    let config = Config {
        block_size: 4096,
        masks: vec!["*.iso".to_string()],
        ..Config::default()
    };
    let content = toml::to_string_pretty(&config).unwrap();
    assert!(content.contains("block_size = 4096"));
    assert!(content.contains("strategy = \"representative\""));

    let parsed: Config = toml::from_str(&content).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_cli_flags_beat_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "block_size = 8192\nthreads = 2\n").unwrap();

    let cli = Cli::try_parse_from(["bayan", "-b", "64", "/data"]).unwrap();
    let mut config = Config::load(Some(&config_path)).unwrap();
    config.merge_cli(&cli.scan);

    assert_eq!(config.block_size, 64);
    assert_eq!(config.threads, 2);
}

#[test]
fn test_merged_zero_threads_fails_validation() {
    let cli = Cli::try_parse_from(["bayan", "-j", "0", "/data"]).unwrap();
    let mut config = Config::default();
    config.merge_cli(&cli.scan);

    assert!(matches!(config.validate(), Err(ConfigError::InvalidThreads)));
}
