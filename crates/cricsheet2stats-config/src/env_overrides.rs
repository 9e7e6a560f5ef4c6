use crate::{LogFormat, RuntimeConfig, ServerConfig};
use anyhow::Result;

pub const ENV_PREFIX: &str = "CRICSHEET2STATS_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    if let Some(dir) = get_env_string(env, "MATCHES_DIR") {
        config.data.matches_dir = dir;
    }
    if let Some(dir) = get_env_string(env, "TABLES_DIR") {
        config.data.tables_dir = dir;
    }

    if let Some(addr) = get_env_string(env, "LISTEN_ADDR") {
        ensure_server(config).listen_addr = addr;
    }
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        ensure_server(config).log_level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        let parsed = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
        ensure_server(config).log_format = parsed;
    }

    Ok(())
}

fn ensure_server(config: &mut RuntimeConfig) -> &mut ServerConfig {
    config.server.get_or_insert_with(ServerConfig::default)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<&'static str, &'static str>);

    impl EnvSource for MapSource {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = RuntimeConfig::default();
        let env = MapSource(HashMap::from([
            ("MATCHES_DIR", "/data/matches"),
            ("LISTEN_ADDR", "0.0.0.0:9999"),
            ("LOG_FORMAT", "json"),
        ]));

        apply_env_overrides(&mut config, &env).unwrap();

        assert_eq!(config.data.matches_dir, "/data/matches");
        let server = config.server.unwrap();
        assert_eq!(server.listen_addr, "0.0.0.0:9999");
        assert_eq!(server.log_format, LogFormat::Json);
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut config = RuntimeConfig::default();
        let env = MapSource(HashMap::from([("TABLES_DIR", "")]));
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.data.tables_dir, "./player_data");
    }
}
