use crate::discovered_server::ADDRESS_FIELD;
use crate::discovered_server::ID_FIELD;
use crate::network::broadcast::BroadcastProbe;
use crate::network::broadcast::Socket2BroadcastProbe;
use crate::network::interface::IfAddrsInterfaceScanner;
use crate::network::interface::InterfaceScanner;
use crate::DiscoveredServer;
use crate::ServerType;
use serde_json::Map;
use serde_json::Value;
use std::net::Ipv4Addr;
use std::net::SocketAddrV4;
use std::time::Duration;
use thiserror::Error;

/// Port that Emby and Jellyfin servers listen to for discovery probes.
pub const DISCOVERY_PORT: u16 = 7359;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(1);
const DISCOVERY_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Where probes are sent.
    pub broadcast_address: SocketAddrV4,

    /// How long to wait for a reply to each probe.
    pub timeout: Duration,

    /// Replies longer than this are truncated.
    pub buffer_size: usize,

    /// Server types to probe for, in order.
    pub server_types: Vec<ServerType>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            broadcast_address: SocketAddrV4::new(Ipv4Addr::BROADCAST, DISCOVERY_PORT),
            timeout: DISCOVERY_TIMEOUT,
            buffer_size: DISCOVERY_BUFFER_SIZE,
            server_types: ServerType::DISCOVERABLE.into(),
        }
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.timeout.is_zero() {
            return Err(DiscoveryError::InvalidTimeout);
        }
        if self.broadcast_address.port() == 0 {
            return Err(DiscoveryError::InvalidPort);
        }
        if let Some(t) = self
            .server_types
            .iter()
            .find(|t| t.discovery_message().is_none())
        {
            return Err(DiscoveryError::UndiscoverableServerType(*t));
        }
        Ok(())
    }
}

/// Discovers Emby and Jellyfin servers in the local network with the default settings.
///
/// Blocks for up to 1 second per server type and local IPv4 address.
pub fn discover() -> Result<Vec<DiscoveredServer>, DiscoveryError> {
    discover_with_config(&DiscoveryConfig::default())
}

/// Probes for every configured server type from every local IPv4 address, one attempt each.
///
/// Servers are returned in the order of the attempts that found them. A server reachable from
/// several interfaces is returned once per interface.
pub fn discover_with_config(
    config: &DiscoveryConfig,
) -> Result<Vec<DiscoveredServer>, DiscoveryError> {
    config.validate()?;
    let probe = Socket2BroadcastProbe::new(
        config.broadcast_address,
        config.timeout,
        config.buffer_size,
    );
    discover_internal(config, &IfAddrsInterfaceScanner, &probe)
}

fn discover_internal(
    config: &DiscoveryConfig,
    interface_scanner: &impl InterfaceScanner,
    probe: &impl BroadcastProbe,
) -> Result<Vec<DiscoveredServer>, DiscoveryError> {
    let local_ips = interface_scanner
        .scan()
        .map_err(DiscoveryError::InterfaceScan)?;
    if local_ips.is_empty() {
        log::info!("No local IPv4 address to send discovery probes from");
    }

    let mut servers = Vec::default();
    for &server_type in &config.server_types {
        let message = server_type
            .discovery_message()
            .ok_or(DiscoveryError::UndiscoverableServerType(server_type))?;
        for &local_ip in &local_ips {
            log::debug!(
                "Probing for {} servers from {} to {}",
                server_type,
                local_ip,
                config.broadcast_address
            );
            let response = probe
                .probe(local_ip, message)
                .map_err(|source| DiscoveryError::Probe {
                    local_ip,
                    server_type,
                    source,
                })?;
            let Some(response) = response else {
                log::debug!("No {} server answered on {}", server_type, local_ip);
                continue;
            };
            if let Some(server) = parse_response(&response, server_type) {
                log::info!(
                    "Discovered {} server {:?} at {:?}",
                    server_type,
                    server.name().unwrap_or_default(),
                    server.address().unwrap_or_default()
                );
                servers.push(server);
            }
        }
    }
    Ok(servers)
}

fn parse_response(response: &[u8], server_type: ServerType) -> Option<DiscoveredServer> {
    let data: Map<String, Value> = match serde_json::from_slice(response) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("Dropping a discovery response that is not a JSON object: {}", e);
            return None;
        }
    };
    if !data.contains_key(ID_FIELD) || !data.contains_key(ADDRESS_FIELD) {
        log::debug!("Dropping a discovery response without an ID or address: {:?}", data);
        return None;
    }
    Some(DiscoveredServer::new(data, server_type))
}

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Discovery timeout must not be zero")]
    InvalidTimeout,

    #[error("Invalid discovery port")]
    InvalidPort,

    #[error("{0} servers cannot be discovered")]
    UndiscoverableServerType(ServerType),

    #[error("Failed to list local network interfaces")]
    InterfaceScan(#[source] std::io::Error),

    #[error("Failed to probe for {server_type} servers from {local_ip}")]
    Probe {
        local_ip: Ipv4Addr,
        server_type: ServerType,
        #[source]
        source: std::io::Error,
    },
}
