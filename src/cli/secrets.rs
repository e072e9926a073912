//! Secret CLI commands
//!
//! Every command expands its `--path` to one physical path per environment of
//! the path's label and reports each physical path it touched.

use anyhow::Result;
use clap::Args;

use super::output;
use crate::config::HelperConfiguration;
use crate::secrets::{load_secret_value, VaultSecretStore};
use crate::services::SecretService;
use crate::tokens::FileTokenCache;

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Secret path, e.g. env/myTeam/myService/jdbc.password
    #[arg(long, value_name = "PATH")]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Secret path, e.g. env/myTeam/myService/jdbc.password
    #[arg(long, value_name = "PATH")]
    pub path: String,

    /// Secret value, or file://<path> to store the contents of a local file
    #[arg(long, value_name = "VALUE")]
    pub value: String,
}

pub async fn handle_read(args: PathArgs, config: &HelperConfiguration) -> Result<()> {
    let tokens = FileTokenCache::new(config.token_cache_path()?);
    let mut service = SecretService::new(config, &tokens, VaultSecretStore::new(config.timeout)?);

    for read in service.read(&args.path).await? {
        output::print_success(&format!("path={}, value={}", read.path, read.value.expose_secret()));
    }
    Ok(())
}

pub async fn handle_list(args: PathArgs, config: &HelperConfiguration) -> Result<()> {
    let tokens = FileTokenCache::new(config.token_cache_path()?);
    let mut service = SecretService::new(config, &tokens, VaultSecretStore::new(config.timeout)?);

    for listing in service.list(&args.path).await? {
        if listing.keys.is_empty() {
            println!("{} has no match", listing.path);
            continue;
        }

        println!("{} has {} value(s):", listing.path, listing.keys.len());
        for key in &listing.keys {
            output::print_item(key);
        }
    }
    Ok(())
}

pub async fn handle_write(args: WriteArgs, config: &HelperConfiguration) -> Result<()> {
    let value = load_secret_value(&args.value)?;
    let tokens = FileTokenCache::new(config.token_cache_path()?);
    let mut service = SecretService::new(config, &tokens, VaultSecretStore::new(config.timeout)?);

    for path in service.write(&args.path, &value).await? {
        output::print_success(&format!("wrote {}", path));
    }
    Ok(())
}

pub async fn handle_delete(args: PathArgs, config: &HelperConfiguration) -> Result<()> {
    let tokens = FileTokenCache::new(config.token_cache_path()?);
    let mut service = SecretService::new(config, &tokens, VaultSecretStore::new(config.timeout)?);

    for path in service.delete(&args.path).await? {
        output::print_success(&format!("deleted {}", path));
    }
    Ok(())
}
