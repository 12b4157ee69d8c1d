//! `host[:port]` parsing, with bracketed IPv6 support.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AuthorityParseError;

static AUTHORITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([0-9.]+)|\[([0-9a-f:.]+)])(:([0-9]{1,5}))?$")
        .expect("authority pattern is a valid regex")
});

/// An `(ip, port)` pair parsed from a `host[:port]` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority {
    ip: IpAddr,
    port: u16,
}

impl Authority {
    /// Construct directly from an address and port.
    #[must_use]
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Authority { ip, port }
    }

    /// The parsed address.
    #[must_use]
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// The parsed port, or `0` if none was supplied.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The host rendered for display: IPv4 as-is, IPv6 bracketed —
    /// preferring the IPv4 form when the address is an IPv4-mapped IPv6
    /// address.
    #[must_use]
    pub fn to_hostname(&self) -> String {
        match self.ip {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => v4.to_string(),
                None => format!("[{v6}]"),
            },
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == 0 {
            write!(f, "{}", self.to_hostname())
        } else {
            write!(f, "{}:{}", self.to_hostname(), self.port)
        }
    }
}

impl FromStr for Authority {
    type Err = AuthorityParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let captures = AUTHORITY_PATTERN
            .captures(text)
            .ok_or_else(|| AuthorityParseError(text.to_owned()))?;

        let ip = if let Some(v4) = captures.get(2) {
            Ipv4Addr::from_str(v4.as_str())
                .map(IpAddr::V4)
                .map_err(|_| AuthorityParseError(text.to_owned()))?
        } else if let Some(v6) = captures.get(3) {
            Ipv6Addr::from_str(v6.as_str())
                .map(IpAddr::V6)
                .map_err(|_| AuthorityParseError(text.to_owned()))?
        } else {
            return Err(AuthorityParseError(text.to_owned()));
        };

        let port = match captures.get(5) {
            Some(port) => port
                .as_str()
                .parse::<u16>()
                .map_err(|_| AuthorityParseError(text.to_owned()))?,
            None => 0,
        };

        Ok(Authority { ip, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipv4_with_port() {
        let authority: Authority = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(authority.port(), 9000);
        assert_eq!(authority.to_hostname(), "127.0.0.1");
    }

    #[test]
    fn parses_bracketed_ipv6() {
        let authority: Authority = "[::1]:9000".parse().unwrap();
        assert_eq!(authority.port(), 9000);
    }

    #[test]
    fn port_defaults_to_zero() {
        let authority: Authority = "127.0.0.1".parse().unwrap();
        assert_eq!(authority.port(), 0);
    }

    #[test]
    fn round_trips_through_display() {
        let authority: Authority = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(authority.to_string().parse::<Authority>().unwrap(), authority);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("not an authority!!".parse::<Authority>().is_err());
    }
}
