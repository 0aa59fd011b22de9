use atlasiq_core::config::ScoringConfig;

use super::file;

/// Load the scoring configuration. No path means the built-in defaults.
/// Files ending in `.yaml`/`.yml` are read as YAML, anything else as JSON.
pub fn load_config(path: Option<&str>) -> Result<ScoringConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ScoringConfig::default());
    };

    let (canonical, contents) = file::read_text(path)?;
    let is_yaml = canonical
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let config = if is_yaml {
        let config: ScoringConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
        config.validate()?;
        config
    } else {
        ScoringConfig::from_json_str(&contents)?
    };

    tracing::debug!(path = %canonical.display(), "scoring configuration loaded");
    Ok(config)
}
