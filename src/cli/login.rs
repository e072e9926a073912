//! LDAP login command

use anyhow::{Context, Result};
use clap::Args;

use super::output;
use crate::config::HelperConfiguration;
use crate::secrets::{SecretString, VaultSecretStore};
use crate::services::LoginService;
use crate::tokens::FileTokenCache;

#[derive(Args)]
pub struct LoginArgs {
    /// LDAP username
    #[arg(long, value_name = "USERNAME")]
    pub ldap_username: String,

    /// LDAP password
    #[arg(long, env = "VAULT_HELPER_LDAP_PASSWORD", hide_env_values = true, value_name = "PASSWORD")]
    pub ldap_password: String,
}

pub async fn handle_login_command(args: LoginArgs, config: &HelperConfiguration) -> Result<()> {
    let token_path = config.token_cache_path()?;
    let tokens = FileTokenCache::new(&token_path);
    let mut store = VaultSecretStore::new(config.timeout)?;
    let password = SecretString::new(args.ldap_password);

    let labels = LoginService::new(config, &tokens)
        .login(&mut store, &args.ldap_username, &password)
        .await
        .context("Login failed")?;

    for label in &labels {
        output::print_success(&format!("Got token for {}", label));
    }
    println!("Tokens saved to {}", token_path.display());
    Ok(())
}
