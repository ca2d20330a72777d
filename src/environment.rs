use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Which monitoring backend the CLI talks to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Backend running on this machine.
    #[default]
    Local,
    /// Any other backend, addressed by its base URL.
    Custom { api_url: String },
}

impl Environment {
    /// Returns the base URL of the monitoring API for the environment.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8080".to_string(),
            Environment::Custom { api_url } => api_url.trim_end_matches('/').to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Environment::Local);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Environment::Custom {
                api_url: trimmed.to_string(),
            });
        }
        Err(format!(
            "unknown environment '{}': expected 'local' or an http(s) URL",
            s
        ))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_and_urls() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!("LOCAL".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!(
            "https://monitor.example.com/".parse::<Environment>(),
            Ok(Environment::Custom {
                api_url: "https://monitor.example.com/".to_string()
            })
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn custom_url_drops_trailing_slash() {
        let env = Environment::Custom {
            api_url: "http://10.0.0.5:8080/".to_string(),
        };
        assert_eq!(env.api_url(), "http://10.0.0.5:8080");
    }
}
