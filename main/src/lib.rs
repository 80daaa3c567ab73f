//! Discovery of Emby and Jellyfin servers in the local network.
//!
//! Servers of both families listen for a UDP broadcast on port 7359 and answer with a JSON object
//! describing themselves. [discover] sends that broadcast from every local IPv4 address and
//! collects the answers as [DiscoveredServer]s.

mod discovered_server;
pub mod network;
mod scanner;
mod server_type;

pub use discovered_server::AddressParseError;
pub use discovered_server::DiscoveredServer;
pub use discovered_server::ServerRecordError;
pub use scanner::discover;
pub use scanner::discover_with_config;
pub use scanner::DiscoveryConfig;
pub use scanner::DiscoveryError;
pub use scanner::DISCOVERY_PORT;
pub use server_type::ServerType;

#[cfg(test)]
mod test;
