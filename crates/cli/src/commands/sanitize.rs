//! `niagate sanitize`: run the output sanitizer over a piece of text.

use niagate_guard::{GuardPolicy, Sanitized};
use std::collections::BTreeSet;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    text: &str,
    allow: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let policy = GuardPolicy::from_config(&config.policy)?;

    let allowed: BTreeSet<String> = allow.into_iter().collect();
    let result = policy.sanitizer.sanitize(text, &allowed);
    print!("{}", report(&result));
    Ok(())
}

fn report(result: &Sanitized) -> String {
    let mut out = String::new();
    if result.is_clean() {
        out.push_str("✅ clean\n");
    } else {
        let label = if result.fallback { "replaced" } else { "rewritten" };
        out.push_str(&format!("⚠️  {label}\n"));
        for action in &result.actions {
            let line = serde_json::to_string(action).unwrap_or_default();
            out.push_str(&format!("   {line}\n"));
        }
    }
    out.push('\n');
    out.push_str(&result.text);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use niagate_config::PolicyConfig;

    fn sanitize(text: &str, allow: &[&str]) -> Sanitized {
        let policy = GuardPolicy::from_config(&PolicyConfig::default()).unwrap();
        let allowed = allow.iter().map(|s| s.to_string()).collect();
        policy.sanitizer.sanitize(text, &allowed)
    }

    #[test]
    fn clean_text_reported_clean() {
        let out = report(&sanitize("დღეს სუნთქვაზე ვმუშაობთ.", &[]));
        assert!(out.starts_with("✅ clean"));
        assert!(out.contains("დღეს სუნთქვაზე ვმუშაობთ."));
    }

    #[test]
    fn foreign_url_lists_action() {
        let result = sanitize("ნახე https://evil.example/x", &[]);
        assert!(!result.text.contains("evil.example"));

        let out = report(&result);
        assert!(out.starts_with("⚠️  replaced"));
        assert!(out.contains("url_replaced"));
    }

    #[test]
    fn allowed_url_passes() {
        let url = "https://media.example/breath.mp3";
        let out = report(&sanitize(&format!("მოუსმინე: {url}"), &[url]));
        assert!(out.starts_with("✅ clean"));
        assert!(out.contains(url));
    }
}
