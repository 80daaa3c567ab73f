use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

const EMBY_DISCOVERY_MESSAGE: &[u8] = b"who is EmbyServer?";
const JELLYFIN_DISCOVERY_MESSAGE: &[u8] = b"who is JellyfinServer?";

/// Family of a media server, which decides the dialect of the discovery protocol.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    #[default]
    Unknown,
    Emby,
    Jellyfin,
}

impl ServerType {
    /// Server types that answer a broadcast probe, in the order they are probed.
    pub const DISCOVERABLE: [ServerType; 2] = [ServerType::Emby, ServerType::Jellyfin];

    /// Payload of the broadcast probe that this type of server responds to.
    pub fn discovery_message(self) -> Option<&'static [u8]> {
        match self {
            ServerType::Unknown => None,
            ServerType::Emby => Some(EMBY_DISCOVERY_MESSAGE),
            ServerType::Jellyfin => Some(JELLYFIN_DISCOVERY_MESSAGE),
        }
    }
}

impl Display for ServerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerType::Unknown => "Unknown",
            ServerType::Emby => "Emby",
            ServerType::Jellyfin => "Jellyfin",
        };
        f.write_str(name)
    }
}
