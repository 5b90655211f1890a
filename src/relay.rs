//! Lighting-protocol relay policy
//!
//! Decides which incoming Art-Net packets a stage repeater forwards and to
//! whom. Sockets live elsewhere; this module only filters by size, applies
//! the rate limit and yields the destination addresses.

use core::net::Ipv4Addr;
use core::ops::Range;

use embassy_time::{Duration, Instant};

/// UDP port used by Art-Net
pub const ARTNET_PORT: u16 = 6454;

/// Size of the only packets the relay forwards
pub const ARTNET_PACKET_SIZE: usize = 530;

/// Minimum time between two forwarded packets
pub const MIN_FORWARD_INTERVAL: Duration = Duration::from_millis(250);

/// Relay configuration
#[derive(Debug, Clone, Copy)]
pub struct RelayConfig {
    /// First three octets of the destination network
    pub network: [u8; 3],
    /// Host octet of the first destination
    pub first_host: u8,
    /// Number of consecutive destinations
    pub host_count: u8,
    pub packet_size: usize,
    pub min_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            network: [10, 0, 0],
            first_host: 20,
            host_count: 20,
            packet_size: ARTNET_PACKET_SIZE,
            min_interval: MIN_FORWARD_INTERVAL,
        }
    }
}

/// Destination addresses of one forwarded packet
#[derive(Debug, Clone)]
pub struct Destinations {
    network: [u8; 3],
    hosts: Range<u16>,
}

impl Iterator for Destinations {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        let host = u8::try_from(self.hosts.next()?).ok()?;
        let [a, b, c] = self.network;
        Some(Ipv4Addr::new(a, b, c, host))
    }
}

/// Rate-limited forwarding decision
#[derive(Debug, Clone)]
pub struct ArtnetRelay {
    config: RelayConfig,
    last_forward: Instant,
}

impl ArtnetRelay {
    pub const fn new(config: RelayConfig) -> Self {
        Self {
            config,
            last_forward: Instant::from_millis(0),
        }
    }

    /// Decide whether a packet of `packet_len` bytes received at `now` is
    /// forwarded
    ///
    /// Packets of any other size are ignored and do not reset the rate
    /// limit. The limit counts from boot, so nothing is forwarded during the
    /// first interval.
    pub fn accept(&mut self, packet_len: usize, now: Instant) -> Option<Destinations> {
        if packet_len != self.config.packet_size {
            return None;
        }
        if now <= self.last_forward + self.config.min_interval {
            return None;
        }

        self.last_forward = now;
        let first = u16::from(self.config.first_host);
        let last = (first + u16::from(self.config.host_count)).min(256);
        Some(Destinations {
            network: self.config.network,
            hosts: first..last,
        })
    }
}
