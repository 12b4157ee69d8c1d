//! `scheme://host[:port]` endpoint URI parsing.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EndpointParseError;

static ENDPOINT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((tcp|udp|http|https|inproc)://)?(\[([0-9a-f:.]+)]|([^:]+))(:([0-9]{1,5}))?$")
        .expect("endpoint pattern is a valid regex")
});

const DEFAULT_HOST: &str = "localhost";

/// A transport scheme recognised in an endpoint URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `tcp://`
    Tcp,
    /// `udp://`
    Udp,
    /// `http://`
    Http,
    /// `https://`
    Https,
    /// `inproc://`
    Inproc,
}

impl Scheme {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "tcp" => Some(Scheme::Tcp),
            "udp" => Some(Scheme::Udp),
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            "inproc" => Some(Scheme::Inproc),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Scheme::Tcp => "tcp",
            Scheme::Udp => "udp",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Inproc => "inproc",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed `scheme://host[:port]` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Option<Scheme>,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Construct directly from parts.
    #[must_use]
    pub fn new(scheme: Option<Scheme>, host: impl Into<String>, port: u16) -> Self {
        Endpoint {
            scheme,
            host: host.into(),
            port,
        }
    }

    /// The endpoint's scheme, if one was present.
    #[must_use]
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    /// The endpoint's host (defaults to `"localhost"` when unspecified).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The endpoint's port, or `0` if none was supplied.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The host with `"*"` mapped to `"localhost"`, for local binds.
    #[must_use]
    pub fn to_local(&self) -> &str {
        if self.host == "*" {
            DEFAULT_HOST
        } else {
            &self.host
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = self.scheme {
            write!(f, "{scheme}://")?;
        }
        write!(f, "{}", self.host)?;
        if self.port != 0 {
            write!(f, ":{}", self.port)?;
        }
        Ok(())
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let captures = ENDPOINT_PATTERN
            .captures(text)
            .ok_or_else(|| EndpointParseError(text.to_owned()))?;

        let scheme = captures.get(2).map(|m| m.as_str()).and_then(Scheme::parse);
        if captures.get(1).is_some() && scheme.is_none() {
            return Err(EndpointParseError(text.to_owned()));
        }

        let host = if let Some(v6) = captures.get(4) {
            format!("[{}]", v6.as_str())
        } else if let Some(host) = captures.get(5) {
            host.as_str().to_owned()
        } else {
            DEFAULT_HOST.to_owned()
        };

        let port = match captures.get(7) {
            Some(port) => port
                .as_str()
                .parse::<u16>()
                .map_err(|_| EndpointParseError(text.to_owned()))?,
            None => 0,
        };

        Ok(Endpoint { scheme, host, port })
    }
}
