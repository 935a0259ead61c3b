//! Configuration file loading and saving.

use std::path::Path;

use anchor_core::AnchorConfig;

/// Load config from a TOML file, falling back to defaults for missing fields.
pub fn load(path: &Path) -> anyhow::Result<AnchorConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: AnchorConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    } else {
        Ok(AnchorConfig::default())
    }
}

/// Save a config to a TOML file.
pub fn save(config: &AnchorConfig, path: &Path) -> anyhow::Result<()> {
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}
