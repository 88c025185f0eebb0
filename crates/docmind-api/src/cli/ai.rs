//! One-shot AI commands: `docmind generate` and `docmind probe`.

use std::io::Write;

use anyhow::Result;
use console::style;
use futures_util::StreamExt;

use docmind_core::ai::action::resolve_prompt;

use crate::state::ConcreteAiService;

/// Generate text for `content` and print it to stdout.
///
/// With `--json`, one-shot output is a single `{"content": ...}` object and
/// streamed output is one such object per chunk.
pub async fn generate(
    ai: &ConcreteAiService,
    action: Option<&str>,
    prompt: Option<&str>,
    content: &str,
    stream: bool,
    json: bool,
) -> Result<()> {
    let prompt = resolve_prompt(action, content, prompt);

    if !stream {
        let text = ai.generate_content(&prompt, None).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "content": text }))?);
        } else {
            println!("{text}");
        }
        return Ok(());
    }

    let mut chunks = ai.generate_content_stream(&prompt, None)?;
    let mut stdout = std::io::stdout();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if json {
            writeln!(stdout, "{}", serde_json::json!({ "content": chunk }))?;
        } else {
            write!(stdout, "{chunk}")?;
            stdout.flush()?;
        }
    }
    if !json {
        writeln!(stdout)?;
    }

    Ok(())
}

/// Check that the configured provider answers.
pub async fn probe(ai: &ConcreteAiService, json: bool) -> Result<()> {
    let report = ai.probe().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} answered in {}",
        style("✓").green().bold(),
        style(format!("{} ({})", report.provider, report.model)).cyan(),
        style(format!("{}ms", report.latency_ms)).bold()
    );
    println!("  {}", style(report.reply.trim()).dim());
    println!();

    Ok(())
}
