//! Peer address model and validation.
//!
//! The peer is identified by a dotted-quad IPv4 host and a TCP port.
//! Everything that accepts an address from the outside (the address form,
//! the CLI flag, the persisted config file) funnels through
//! [`AddressErrors::check`] so every entry point classifies bad input
//! identically.

use std::{
    fmt,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    str::FromStr,
};

/// Validated address of the peer to dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddr {
    /// IPv4 host of the peer.
    pub host: Ipv4Addr,
    /// TCP port of the peer.
    pub port: u16,
}

impl PeerAddr {
    /// Create an address from already-validated parts.
    #[must_use]
    pub fn new(host: Ipv4Addr, port: u16) -> Self {
        Self { host, port }
    }

    /// This address as a socket address for the transport.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl From<PeerAddr> for SocketAddr {
    fn from(addr: PeerAddr) -> Self {
        addr.socket_addr()
    }
}

impl FromStr for PeerAddr {
    type Err = AddressErrors;

    /// Parse a `host:port` pair.
    ///
    /// A missing `:` separator classifies as an invalid port, the same way
    /// an empty port field in the address form does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.split_once(':').unwrap_or((s, ""));
        let errors = AddressErrors::check(host, port);
        if !errors.is_valid() {
            return Err(errors);
        }
        // check() proved both parts parse.
        match (Ipv4Addr::from_str(host), u16::from_str(port)) {
            (Ok(host), Ok(port)) => Ok(Self { host, port }),
            _ => Err(errors),
        }
    }
}

/// Classification of a host/port pair supplied by the user or a config file.
///
/// Bitmask-style so both fields can be reported from one pass, the way the
/// address form flags each bad field at once: bit 0 marks a bad host, bit 1
/// a bad port. Zero bits mean the pair is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressErrors(u8);

impl AddressErrors {
    /// Bit set when the host is not a dotted quad with octets in 0..=255.
    pub const INVALID_HOST: u8 = 0b01;
    /// Bit set when the port does not parse into 0..=65535.
    pub const INVALID_PORT: u8 = 0b10;
    /// The all-clear classification.
    pub const NONE: Self = Self(0);

    /// Classify a host/port pair.
    ///
    /// The host rule matches `Ipv4Addr` parsing: exactly four decimal
    /// octets, each 0..=255, no leading zeros. The port rule is a plain
    /// `u16` parse, so `-1` and `70000` both fail.
    #[must_use]
    pub fn check(host: &str, port: &str) -> Self {
        let mut bits = 0;
        if Ipv4Addr::from_str(host).is_err() {
            bits |= Self::INVALID_HOST;
        }
        if u16::from_str(port).is_err() {
            bits |= Self::INVALID_PORT;
        }
        Self(bits)
    }

    /// Raw bitmask (0 = valid).
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// True when no field failed validation.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0 == 0
    }

    /// True when the host failed validation.
    #[must_use]
    pub fn invalid_host(self) -> bool {
        self.0 & Self::INVALID_HOST != 0
    }

    /// True when the port failed validation.
    #[must_use]
    pub fn invalid_port(self) -> bool {
        self.0 & Self::INVALID_PORT != 0
    }
}

impl fmt::Display for AddressErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.invalid_host(), self.invalid_port()) {
            (false, false) => write!(f, "valid address"),
            (true, false) => write!(f, "invalid host address"),
            (false, true) => write!(f, "invalid port"),
            (true, true) => write!(f, "invalid host address and port"),
        }
    }
}

impl std::error::Error for AddressErrors {}
