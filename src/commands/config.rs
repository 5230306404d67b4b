use anyhow::Result;

use crate::Context;
use crate::config::{VAULT_ROLE_ID_VAR, VAULT_SECRET_ID_VAR};
use crate::ui;

/// Show the configuration read from the environment
pub fn run(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    ui::header("Configuration");
    ui::kv(VAULT_ROLE_ID_VAR, &ui::mask(&config.vault_role_id));
    ui::kv(VAULT_SECRET_ID_VAR, &ui::mask(&config.vault_secret_id));
    println!();

    if config.is_complete() {
        ui::success("Vault AppRole credentials are set");
    } else {
        ui::warn("Vault AppRole credentials are incomplete");
        ui::dim(&format!(
            "export {VAULT_ROLE_ID_VAR} and {VAULT_SECRET_ID_VAR}"
        ));
    }

    if ctx.verbose > 0 {
        ui::info(&format!("{config:?}"));
    }
    Ok(())
}
