//! `niagate check`: classify a message without calling anything.

use niagate_guard::{Classification, GuardPolicy};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let policy = GuardPolicy::from_config(&config.policy)?;

    let classification = policy.classifier.classify(message);
    println!("{}", describe(&classification, &policy));
    Ok(())
}

fn describe(classification: &Classification, policy: &GuardPolicy) -> String {
    match classification {
        Classification::HardStop { term } => format!(
            "🛑 hard_stop (matched \"{term}\")\n   Reply: {}",
            policy.messages.hard_stop
        ),
        Classification::Blocked { term } => format!(
            "🚫 blocked (matched \"{term}\")\n   Reply: one of {} input-blocked refusals",
            policy.refusals.set(niagate_guard::RefusalCategory::InputBlocked).len()
        ),
        Classification::Allowed => "✅ allowed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niagate_config::PolicyConfig;

    fn policy() -> GuardPolicy {
        GuardPolicy::from_config(&PolicyConfig::default()).unwrap()
    }

    #[test]
    fn describes_hard_stop_with_fixed_text() {
        let policy = policy();
        let c = policy.classifier.classify("მაქვს ძლიერი ტკივილი");
        let out = describe(&c, &policy);
        assert!(out.starts_with("🛑 hard_stop"));
        assert!(out.contains(&policy.messages.hard_stop));
    }

    #[test]
    fn describes_blocked_and_allowed() {
        let policy = policy();
        let blocked = describe(&policy.classifier.classify("რა წამალი დავლიო?"), &policy);
        assert!(blocked.contains("წამალი"));

        let allowed = describe(&policy.classifier.classify("რა არის დღის ფოკუსი?"), &policy);
        assert_eq!(allowed, "✅ allowed");
    }
}
