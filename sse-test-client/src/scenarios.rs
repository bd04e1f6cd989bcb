use anyhow::Result;
use colored::*;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::output::{print_event, TestResult};
use crate::sse_client::{Connection, Event};

pub async fn test_health(client: &reqwest::Client, base_url: &str) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: Health ===".bright_cyan().bold());

    let (status, body) = get_json(client, base_url, "/healthz").await?;
    let expected = json!({"status": "healthy"});

    if status == reqwest::StatusCode::OK && body == expected {
        println!("{} /healthz reported healthy", "✓".green());
        Ok(TestResult::pass("health", start.elapsed()))
    } else {
        println!("{} Unexpected /healthz response", "✗".red());
        Ok(TestResult::fail(
            "health",
            format!("Expected 200 {expected}, got {status} {body}"),
            start.elapsed(),
        ))
    }
}

pub async fn test_home(
    client: &reqwest::Client,
    base_url: &str,
    expected_service: Option<&str>,
) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: Home ===".bright_cyan().bold());

    let (status, body) = get_json(client, base_url, "/").await?;

    let ok = body["ok"] == Value::Bool(true);
    let service_matches = match expected_service {
        Some(name) => body["service"] == name,
        None => body["service"].is_string(),
    };

    if status == reqwest::StatusCode::OK && ok && service_matches {
        println!("{} Homepage identified service {}", "✓".green(), body["service"]);
        Ok(TestResult::pass("home", start.elapsed()))
    } else {
        println!("{} Unexpected homepage response", "✗".red());
        Ok(TestResult::fail(
            "home",
            format!("Got {status} {body}"),
            start.elapsed(),
        ))
    }
}

pub async fn test_stream(
    base_url: &str,
    expected_count: Option<u32>,
    timeout: Duration,
) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: Token Stream ===".bright_cyan().bold());

    println!("{} Opening /stream...", "→".blue());
    let mut connection = Connection::establish(base_url, "stream".to_string()).await?;

    let events = match connection.collect_until_done(timeout).await {
        Ok(events) => events,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            return Ok(TestResult::fail("stream", e.to_string(), start.elapsed()));
        }
    };

    for event in &events {
        print_event(&connection.label, event);
    }

    match verify_token_sequence(&events, expected_count) {
        Ok(count) => {
            let span = match (events.first(), events.last()) {
                (Some(first), Some(last)) => last.timestamp.duration_since(first.timestamp),
                _ => Duration::ZERO,
            };
            println!(
                "{} Received {} tokens in order over {:?}",
                "✓".green(),
                count,
                span
            );
            Ok(TestResult::pass("stream", start.elapsed()))
        }
        Err(message) => {
            println!("{} {}", "✗".red(), message);
            Ok(TestResult::fail("stream", message, start.elapsed()))
        }
    }
}

/// Checks that `events` is `token` 1..=n followed by one `done` whose count is n,
/// and that n matches `expected_count` when given. Returns n.
pub fn verify_token_sequence(events: &[Event], expected_count: Option<u32>) -> Result<u32, String> {
    let Some((done, tokens)) = events.split_last() else {
        return Err("No events received".to_string());
    };

    if done.event_type != "done" {
        return Err(format!("Last event was {:?}, expected done", done.event_type));
    }

    for (i, event) in tokens.iter().enumerate() {
        let expected_index = i as u64 + 1;
        if event.event_type != "token" {
            return Err(format!(
                "Event {expected_index} was {:?}, expected token",
                event.event_type
            ));
        }
        let index = event.data["data"]["index"].as_u64();
        if index != Some(expected_index) {
            return Err(format!(
                "Token {expected_index} carried index {index:?}"
            ));
        }
    }

    let sent = tokens.len() as u64;
    let reported = done.data["data"]["count"].as_u64();
    if reported != Some(sent) {
        return Err(format!("done reported {reported:?} tokens, received {sent}"));
    }

    let count = sent as u32;
    if let Some(expected) = expected_count {
        if count != expected {
            return Err(format!("Expected {expected} tokens, received {count}"));
        }
    }

    Ok(count)
}

async fn get_json(
    client: &reqwest::Client,
    base_url: &str,
    path: &str,
) -> Result<(reqwest::StatusCode, Value)> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    let response = client.get(&url).send().await?;
    let status = response.status();
    let body = response.json::<Value>().await?;
    Ok((status, body))
}
