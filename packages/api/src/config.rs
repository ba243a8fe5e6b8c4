//! Server-side loading of `studio.toml`.
//!
//! The path comes from `STUDIO_CONFIG`, defaulting to `studio.toml` in the
//! working directory. A missing file means defaults.

use std::path::PathBuf;
use std::sync::OnceLock;

use studio::StudioConfig;

static CONFIG: OnceLock<StudioConfig> = OnceLock::new();

fn config_path() -> PathBuf {
    dotenvy::dotenv().ok();
    std::env::var("STUDIO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(StudioConfig::filename()))
}

/// Read and parse the config file.
pub fn load_studio_config() -> Result<StudioConfig, String> {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(text) => StudioConfig::from_toml(&text)
            .map_err(|e| format!("Invalid config {}: {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StudioConfig::default()),
        Err(e) => Err(format!("Failed to read {}: {e}", path.display())),
    }
}

/// The process-wide config, loaded on first use. A broken file is logged and
/// replaced by defaults.
pub fn studio_config() -> &'static StudioConfig {
    CONFIG.get_or_init(|| {
        load_studio_config().unwrap_or_else(|e| {
            tracing::error!("{e}; using default configuration");
            StudioConfig::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn studio_name_comes_from_the_configured_file() {
        let path = std::env::temp_dir().join(format!("studio-{}.toml", std::process::id()));
        std::fs::write(&path, "[studio]\nname = \"Ink Annex\"\n").unwrap();
        std::env::set_var("STUDIO_CONFIG", &path);

        let config = load_studio_config().unwrap();
        assert_eq!(config.studio.name, "Ink Annex");
        assert_eq!(config.feed.long_poll_secs, 25);

        std::env::set_var("STUDIO_CONFIG", path.with_extension("missing"));
        assert_eq!(load_studio_config().unwrap(), StudioConfig::default());

        std::env::remove_var("STUDIO_CONFIG");
        std::fs::remove_file(&path).unwrap();
    }
}
