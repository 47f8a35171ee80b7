//! `niagate ask`: one message through the full pipeline, printed locally.

use niagate_core::request::GuardedRequest;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    message: String,
    program: Option<String>,
    day: Option<f64>,
    allow: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let pipeline = niagate_gateway::build_pipeline(&config).await?;

    let request = build_request(message, program, day, allow)?;
    let outcome = pipeline.handle(&request).await;

    println!("[{}]", outcome.disposition);
    println!("{}", outcome.reply.text);
    Ok(())
}

fn build_request(
    message: String,
    program: Option<String>,
    day: Option<f64>,
    allow: Vec<String>,
) -> Result<GuardedRequest, Box<dyn std::error::Error>> {
    let mut request = GuardedRequest::new(message);
    if request.message.is_empty() {
        return Err("message must not be empty".into());
    }
    if let (Some(program), Some(day)) = (program, day) {
        request = request.with_day(program, day);
    }
    Ok(request.with_allowed_urls(allow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_needs_both_parts() {
        let r = build_request("hi".into(), Some("wakeup_7_days".into()), None, vec![]).unwrap();
        assert!(r.day.is_none());

        let r = build_request("hi".into(), Some("wakeup_7_days".into()), Some(2.0), vec![]).unwrap();
        assert_eq!(r.day.unwrap().program_id, "wakeup_7_days");
    }

    #[test]
    fn blank_message_rejected() {
        assert!(build_request("   ".into(), None, None, vec![]).is_err());
    }

    #[test]
    fn allowlist_carried() {
        let r = build_request("hi".into(), None, None, vec!["https://a.example/x".into()]).unwrap();
        assert!(r.allowed_media_urls.contains("https://a.example/x"));
    }
}
