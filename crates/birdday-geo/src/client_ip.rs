use std::net::IpAddr;

/// The raw network signals a trigger arrives with.
#[derive(Debug, Clone, Default)]
pub struct ClientSignal {
    /// Address of the TCP peer, if known.
    pub peer: Option<IpAddr>,
    /// Raw `X-Forwarded-For` header value.
    pub forwarded_for: Option<String>,
}

impl ClientSignal {
    #[must_use]
    pub fn new(peer: Option<IpAddr>, forwarded_for: Option<String>) -> Self {
        Self {
            peer,
            forwarded_for,
        }
    }

    /// A signal carrying a single, already-trusted address.
    #[must_use]
    pub fn direct(ip: IpAddr) -> Self {
        Self {
            peer: Some(ip),
            forwarded_for: None,
        }
    }

    /// The address to geolocate.
    ///
    /// A loopback peer means we sit behind a reverse proxy, so the first
    /// parseable `X-Forwarded-For` entry is used instead. A loopback peer
    /// without that header carries no usable signal.
    #[must_use]
    pub fn effective_ip(&self) -> Option<IpAddr> {
        match self.peer {
            Some(ip) if !ip.to_canonical().is_loopback() => Some(ip),
            _ => self
                .forwarded_for
                .as_deref()
                .and_then(first_forwarded_ip),
        }
    }
}

fn first_forwarded_ip(header: &str) -> Option<IpAddr> {
    header
        .split(',')
        .find_map(|entry| entry.trim().parse::<IpAddr>().ok())
        .filter(|ip| !ip.to_canonical().is_loopback())
}
