use serde::{Deserialize, Serialize};

/// Key verification defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Value of `validateAgainstApiProxiesAndEnvs` when a request omits it.
    #[serde(default = "default_true")]
    pub default_validate_proxies_and_envs: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            default_validate_proxies_and_envs: true,
        }
    }
}

fn default_true() -> bool {
    true
}
