//! Environment variable overrides.
//!
//! | Variable                    | Effect                                   |
//! |-----------------------------|------------------------------------------|
//! | `MCDEV_MODPC_DEBUGGER_PORT` | force debugger attach on this port       |
//! | `MCDEV_IS_SUBPROCESS_MODE`  | launch bare: no hot reload, no ipc       |
//!
//! `MCDEV_DEBUG_IPC_PORT` goes the other way: it is *set* for the child.

/// Variable injected into the child with the debug channel port.
pub const IPC_PORT_VAR: &str = "MCDEV_DEBUG_IPC_PORT";

const DEBUGGER_PORT_VAR: &str = "MCDEV_MODPC_DEBUGGER_PORT";
const SUBPROCESS_MODE_VAR: &str = "MCDEV_IS_SUBPROCESS_MODE";

/// Snapshot of the overrides, read once at config load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub debugger_port: Option<u16>,
    pub subprocess_mode: bool,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            debugger_port: lookup(DEBUGGER_PORT_VAR).as_deref().and_then(parse_port),
            subprocess_mode: lookup(SUBPROCESS_MODE_VAR)
                .as_deref()
                .is_some_and(parse_flag),
        }
    }
}

fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|&p| p > 0)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_empty_env() {
        assert_eq!(EnvOverrides::from_lookup(lookup(&[])), EnvOverrides::default());
    }

    #[test]
    fn test_debugger_port() {
        let env = EnvOverrides::from_lookup(lookup(&[(DEBUGGER_PORT_VAR, "5678")]));
        assert_eq!(env.debugger_port, Some(5678));
    }

    #[test]
    fn test_debugger_port_out_of_range() {
        for bad in ["0", "70000", "-1", "abc"] {
            let env = EnvOverrides::from_lookup(lookup(&[(DEBUGGER_PORT_VAR, bad)]));
            assert_eq!(env.debugger_port, None, "{bad}");
        }
    }

    #[test]
    fn test_subprocess_flag_variants() {
        for yes in ["1", "true", "TRUE", "Yes"] {
            let env = EnvOverrides::from_lookup(lookup(&[(SUBPROCESS_MODE_VAR, yes)]));
            assert!(env.subprocess_mode, "{yes}");
        }
        let env = EnvOverrides::from_lookup(lookup(&[(SUBPROCESS_MODE_VAR, "0")]));
        assert!(!env.subprocess_mode);
    }
}
