//! `niagate config`: configuration management commands.

use niagate_config::AppConfig;
use niagate_guard::GuardPolicy;
use std::path::Path;

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    let config = match super::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ {e}");
            return Err(e);
        }
    };
    println!("   ✅ Config parsed successfully");

    if let Err(e) = GuardPolicy::from_config(&config.policy) {
        println!("   ❌ Policy error: {e}");
        return Err(e.into());
    }
    println!("   ✅ Policy compiled");

    let warnings = warnings(&config);
    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    println!("   Provider:  {}", config.completion.provider);
    println!("   Model:     {}", config.completion.model);
    println!(
        "   Gateway:   {}:{}{}",
        config.gateway.host, config.gateway.port, config.gateway.path
    );
    println!("   Store:     {}", config.store.backend);
    println!(
        "   Policy:    {} hard-stop, {} blocked, {} directive",
        config.policy.hard_stop_terms.len(),
        config.policy.blocked_terms.len(),
        config.policy.directive_patterns.len()
    );

    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    println!("{}", render(&config)?);
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::config_file(config_path);
    println!("{}", path.display());
    if !path.exists() {
        println!("   (file does not exist; defaults are in effect)");
    }
    Ok(())
}

/// Effective config as TOML, API key masked.
fn render(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut redacted = config.clone();
    if redacted.completion.api_key.is_some() {
        redacted.completion.api_key = Some("***".into());
    }
    toml::to_string_pretty(&redacted)
}

fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.has_api_key() {
        let hint = match config.completion.provider.as_str() {
            "gemini" => "NIAGATE_API_KEY or GEMINI_API_KEY",
            "openai" => "NIAGATE_API_KEY or OPENAI_API_KEY",
            _ => "NIAGATE_API_KEY",
        };
        warnings.push(format!(
            "No API key set for '{}' (set {hint})",
            config.completion.provider
        ));
    }

    if config.store.backend == "memory" {
        warnings.push("store.backend = \"memory\" serves no curriculum; every day is not found".into());
    }

    if config.policy.directive_patterns.is_empty() {
        warnings.push("No directive patterns; model output is only URL-checked".into());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_masks_api_key() {
        let mut config = AppConfig::default();
        config.completion.api_key = Some("secret-key-123".into());
        let out = render(&config).unwrap();
        assert!(!out.contains("secret-key-123"));
        assert!(out.contains("***"));
    }

    #[test]
    fn rendered_config_parses_back() {
        let out = render(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&out).unwrap();
        assert_eq!(parsed.gateway.path, AppConfig::default().gateway.path);
    }

    #[test]
    fn warns_about_missing_key_and_memory_store() {
        let mut config = AppConfig::default();
        config.completion.api_key = None;
        config.store.backend = "memory".into();
        let w = warnings(&config);
        assert_eq!(w.len(), 2);
    }

    #[tokio::test]
    async fn validate_rejects_bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "[policy]\ndirective_patterns = [\"(unclosed\"]\n").unwrap();
        assert!(validate(Some(file.as_path())).await.is_err());
    }
}
