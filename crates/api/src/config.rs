use anyhow::Context;

const PORT_VAR: &str = "TASCHED__SERVER__PORT";
const BODY_LIMIT_VAR: &str = "TASCHED__SERVER__BODY_LIMIT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            body_limit: 2 * 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut s = Self::default();
        if let Some(v) = get(PORT_VAR) {
            s.port = v
                .trim()
                .parse()
                .with_context(|| format!("{PORT_VAR}={v:?} is not a port"))?;
        }
        if let Some(v) = get(BODY_LIMIT_VAR) {
            s.body_limit = v
                .trim()
                .parse()
                .with_context(|| format!("{BODY_LIMIT_VAR}={v:?} is not a byte count"))?;
        }
        Ok(s)
    }

    pub fn addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
