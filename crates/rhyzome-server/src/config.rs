//! Process configuration, read from flags with environment fallbacks.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rhyzome",
    version,
    about = "Graph-shaped microblog store guarded by single-use access tokens"
)]
pub struct ServerArgs {
    /// SQLite database file, or `:memory:` for a throwaway store
    #[arg(long, env = "RHYZOME_DB", default_value = "rhyzome.db")]
    pub db: PathBuf,

    /// Address to listen on
    #[arg(long, env = "RHYZOME_BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Password required by `POST /tokens`
    #[arg(long, env = "RHYZOME_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,
}

impl ServerArgs {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.admin_password.trim().is_empty() {
            anyhow::bail!("admin password must not be empty (set --admin-password or RHYZOME_ADMIN_PASSWORD)");
        }
        Ok(())
    }
}
