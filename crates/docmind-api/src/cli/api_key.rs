//! `docmind api-key create`.

use anyhow::Result;
use console::style;

use docmind_infra::postgres::api_key::PgApiKeyStore;
use docmind_infra::postgres::pool::DatabasePool;

/// Mint a key, store its hash, and print the plaintext once.
pub async fn create_api_key(pool: DatabasePool, name: &str, json: bool) -> Result<()> {
    let created = PgApiKeyStore::new(pool).create(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} API key '{}' created (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(&created.name).cyan()
    );
    println!();
    println!("  {}", style(&created.key).yellow().bold());
    println!();
    println!(
        "  {}",
        style("Restart `docmind serve` for the new key to be accepted.").dim()
    );
    println!();

    Ok(())
}
