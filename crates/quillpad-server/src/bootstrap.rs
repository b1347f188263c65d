//! First-startup seeding.

use std::sync::Arc;

use quillpad_auth::Role;
use quillpad_storage::{NewUser, UserStore};

use crate::config::BootstrapConfig;
use crate::handlers::auth::hash_password;

/// Creates the configured admin account if the user store is empty.
///
/// Runs once at startup, before the server accepts traffic. A populated
/// store means this deployment was already bootstrapped, so the config entry
/// is ignored and nothing is overwritten.
pub async fn seed_admin(
    users: &Arc<dyn UserStore>,
    cfg: &BootstrapConfig,
) -> Result<(), anyhow::Error> {
    let Some(admin) = &cfg.admin_user else {
        return Ok(());
    };

    let existing = users.count().await?;
    if existing > 0 {
        tracing::debug!(users = existing, "user store not empty, skipping admin bootstrap");
        return Ok(());
    }

    let password_hash =
        hash_password(&admin.password).map_err(|e| anyhow::anyhow!("{}", e.message))?;

    let user = users
        .create(NewUser {
            email: admin.email.trim().to_ascii_lowercase(),
            password_hash,
            role: Role::Admin.as_str().to_string(),
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "bootstrap admin created");
    Ok(())
}
