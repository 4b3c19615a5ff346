// tests/integration/main.rs

mod config_loading;
