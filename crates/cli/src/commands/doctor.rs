//! `niagate doctor`: diagnose configuration, policy and store health.

use niagate_guard::{GuardPolicy, RefusalCategory};
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 niagate doctor");
    println!("=================\n");

    let mut issues = 0;

    let path = super::config_file(config_path);
    if !path.exists() {
        println!("  ⚠️  No config file at {}; defaults in effect", path.display());
        issues += 1;
    }

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  ⚠️  1 blocking issue. Fix the config and re-run.");
            return Ok(());
        }
    };

    match GuardPolicy::from_config(&config.policy) {
        Ok(policy) => {
            let refusals: usize = RefusalCategory::ALL
                .iter()
                .map(|c| policy.refusals.set(*c).len())
                .sum();
            println!("  ✅ Policy compiled ({refusals} refusal texts)");
        }
        Err(e) => {
            println!("  ❌ Policy invalid: {e}");
            issues += 1;
        }
    }

    match niagate_providers::build_from_config(&config.completion) {
        Ok(backend) => println!("  ✅ Completion backend '{}' ready", backend.name()),
        Err(e) => {
            println!("  ❌ Completion backend: {e}");
            issues += 1;
        }
    }

    match niagate_store::build_from_config(&config.store).await {
        Ok(store) => println!(
            "  ✅ Curriculum store '{}' open ({})",
            store.name(),
            config.store.resolved_path().display()
        ),
        Err(e) => {
            println!("  ❌ Curriculum store: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
