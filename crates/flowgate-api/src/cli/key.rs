//! `key` subcommand: inspect the signing key.

use flowgate_core::keys::SigningKeyStore;

use crate::state::AppState;

/// Print the active public key, creating the keypair on first run.
/// The engine operator registers this key for assertion verification.
pub async fn show_key(state: &AppState, json: bool) -> anyhow::Result<()> {
    let info = state.key_store.public_key().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!();
        println!(
            "  {} Active signing key: {}",
            console::style("🔑").bold(),
            console::style(&info.key_id).cyan()
        );
        println!();
        println!("{}", info.public_key);
    }

    Ok(())
}
