//! URLs advertised by the dev server.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Where the dev server can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    /// URL for this machine
    pub local: String,
    /// URL for other machines on the private network, if one was found
    pub lan: Option<String>,
}

impl Urls {
    /// Every advertised URL, local first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.local.as_str()).chain(self.lan.as_deref())
    }
}

/// Build the URLs for `protocol://host:port/`.
///
/// An unspecified host (`0.0.0.0`, `::`) is shown as `localhost`, and only
/// then is a LAN address looked up.
pub fn prepare_urls(protocol: &str, host: &str, port: u16) -> Urls {
    let unspecified = is_unspecified(host);
    let pretty_host = if unspecified { "localhost" } else { host };

    let lan = if unspecified {
        lan_address().map(|ip| format_url(protocol, &ip.to_string(), port))
    } else {
        None
    };

    Urls {
        local: format_url(protocol, pretty_host, port),
        lan,
    }
}

fn format_url(protocol: &str, host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("{}://[{}]:{}/", protocol, host, port)
    } else {
        format!("{}://{}:{}/", protocol, host, port)
    }
}

fn is_unspecified(host: &str) -> bool {
    host.parse::<IpAddr>()
        .map(|ip| ip.is_unspecified())
        .unwrap_or(false)
}

/// The private IPv4 address of the default route, if any.
///
/// Connecting a UDP socket sends nothing; it only selects a local address.
fn lan_address() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(10, 255, 255, 255), 1)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if ip.is_private() => Some(ip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_host_is_localhost() {
        let urls = prepare_urls("http", "0.0.0.0", 3000);
        assert_eq!(urls.local, "http://localhost:3000/");
        if let Some(lan) = &urls.lan {
            assert!(lan.starts_with("http://"));
            assert!(lan.ends_with(":3000/"));
        }
    }

    #[test]
    fn test_explicit_host() {
        let urls = prepare_urls("https", "127.0.0.1", 8443);
        assert_eq!(urls.local, "https://127.0.0.1:8443/");
        assert_eq!(urls.lan, None);
        assert_eq!(urls.all().collect::<Vec<_>>(), vec!["https://127.0.0.1:8443/"]);
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let urls = prepare_urls("http", "::1", 3000);
        assert_eq!(urls.local, "http://[::1]:3000/");
    }

    #[test]
    fn test_ipv6_unspecified() {
        assert_eq!(prepare_urls("http", "::", 3000).local, "http://localhost:3000/");
    }
}
