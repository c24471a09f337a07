//! Volunteer resolution for `ElderConnect` commands.
//!
//! Every record is owned by one volunteer. Rather than requiring `--as` on
//! every invocation, the volunteer is resolved through a chain:
//!
//! 1. `--as <volunteer>`: explicit per-command override
//! 2. `ELDERCONNECT_VOLUNTEER` env var: session level
//! 3. `volunteer` in `~/.elderconnect/config.toml`: global default

use std::env;

use crate::config::Config;

/// Error message shown when the volunteer cannot be resolved.
pub const VOLUNTEER_REQUIRED: &str = "volunteer required: pass --as <volunteer>, \
    set ELDERCONNECT_VOLUNTEER, or add `volunteer = \"...\"` to ~/.elderconnect/config.toml";

/// Resolve the owning volunteer from the tiered resolution chain.
pub fn resolve_volunteer(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    resolve_with(
        explicit,
        env::var("ELDERCONNECT_VOLUNTEER").ok().as_deref(),
        config,
    )
}

fn resolve_with(
    explicit: Option<&str>,
    from_env: Option<&str>,
    config: &Config,
) -> Result<String, String> {
    [explicit, from_env, config.volunteer.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| VOLUNTEER_REQUIRED.to_string())
}
