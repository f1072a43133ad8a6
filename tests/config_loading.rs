//! Loading the shipped example configuration.

use std::path::Path;

use alloy::primitives::U256;

use chain_trigger::config::{load_config, ConfigError};
use chain_trigger::watcher::TransferPlan;

#[test]
fn test_example_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.toml");
    let config = load_config(&path).unwrap();

    assert!(config.watcher.ws_url.starts_with("wss://"));
    assert_eq!(config.watcher.every_n_blocks, 10);
    assert_eq!(config.venues.len(), 2);
    assert_eq!(config.venues[0].name, "uniswap");
    assert_eq!(config.venues[1].chain_id, 421_613);

    let plan = TransferPlan::from_config(&config.watcher).unwrap();
    assert_eq!(plan.value, U256::from(1_000_000_000_000_000u64));
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let path = std::env::temp_dir().join("chain_trigger_invalid_config.toml");
    std::fs::write(
        &path,
        r#"
        [watcher]
        ws_url = "https://not-a-stream"
        every_n_blocks = 0

        [[venues]]
        name = ""
        rpc_url = "ftp://nowhere"
        chain_id = 1
        private_key_env = "K"
        target = "0x01"
        from_token = "0x0000000000000000000000000000000000000002"
        to_token = "0x0000000000000000000000000000000000000003"
        "#,
    )
    .unwrap();

    let err = load_config(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap_or_default();

    let ConfigError::Validation(errors) = err else {
        panic!("expected validation errors, got {}", err);
    };
    // ws_url scheme, every_n_blocks, venue name, venue scheme, venue target
    assert_eq!(errors.len(), 5);
}
