use crate::ServerType;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use std::cell::OnceCell;
use thiserror::Error;
use url::Host;
use url::Url;

pub(crate) const ID_FIELD: &str = "Id";
pub(crate) const ADDRESS_FIELD: &str = "Address";
const NAME_FIELD: &str = "Name";

const HTTPS_SCHEME: &str = "https";

/// A server that answered a discovery probe.
///
/// Wraps the JSON object of the response as received. Host, port and TLS usage are derived from the
/// `Address` field the first time any of them is asked for. The outcome is cached, including a
/// parse failure.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredServer {
    #[serde(rename = "type")]
    server_type: ServerType,
    data: Map<String, Value>,

    #[serde(skip)]
    parsed_address: OnceCell<Result<ParsedAddress, AddressParseError>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedAddress {
    host: String,
    port: u16,
    use_ssl: bool,
}

impl DiscoveredServer {
    pub fn new(data: Map<String, Value>, server_type: ServerType) -> Self {
        Self {
            server_type,
            data,
            parsed_address: OnceCell::new(),
        }
    }

    /// Unique ID of the server.
    pub fn id(&self) -> Result<&str, ServerRecordError> {
        self.required_field(ID_FIELD)
    }

    /// Address of the server, e.g. `http://192.168.1.2:8096`.
    pub fn address(&self) -> Result<&str, ServerRecordError> {
        self.required_field(ADDRESS_FIELD)
    }

    /// Friendly name of the server, if it announced one.
    pub fn name(&self) -> Option<&str> {
        self.data.get(NAME_FIELD).and_then(Value::as_str)
    }

    pub fn host(&self) -> Result<&str, ServerRecordError> {
        Ok(&self.parsed_address()?.host)
    }

    pub fn port(&self) -> Result<u16, ServerRecordError> {
        Ok(self.parsed_address()?.port)
    }

    /// Whether the address uses the `https` scheme.
    pub fn use_ssl(&self) -> Result<bool, ServerRecordError> {
        Ok(self.parsed_address()?.use_ssl)
    }

    pub fn server_type(&self) -> ServerType {
        self.server_type
    }

    /// The response object as received, including fields not interpreted here.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    fn required_field(&self, field: &'static str) -> Result<&str, ServerRecordError> {
        self.data
            .get(field)
            .ok_or(ServerRecordError::MissingField(field))?
            .as_str()
            .ok_or(ServerRecordError::NotAString(field))
    }

    fn parsed_address(&self) -> Result<&ParsedAddress, ServerRecordError> {
        let address = self.address()?;
        self.parsed_address
            .get_or_init(|| parse_address(address))
            .as_ref()
            .map_err(|e| ServerRecordError::AddressParse {
                address: address.to_owned(),
                source: e.clone(),
            })
    }
}

fn parse_address(address: &str) -> Result<ParsedAddress, AddressParseError> {
    #[cfg(test)]
    test::count_address_parse();

    let url = Url::parse(address)?;
    let host = match url.host().ok_or(AddressParseError::MissingHost)? {
        Host::Domain(domain) => domain.to_owned(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    };
    let port = url
        .port_or_known_default()
        .ok_or(AddressParseError::MissingPort)?;
    Ok(ParsedAddress {
        host,
        port,
        use_ssl: url.scheme() == HTTPS_SCHEME,
    })
}

#[derive(Error, Debug)]
pub enum ServerRecordError {
    #[error("Field `{0}` is missing from the discovery response")]
    MissingField(&'static str),

    #[error("Field `{0}` of the discovery response is not a string")]
    NotAString(&'static str),

    #[error("Invalid server address `{address}`")]
    AddressParse {
        address: String,
        #[source]
        source: AddressParseError,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("Malformed URL")]
    Url(#[from] url::ParseError),

    #[error("URL has no host")]
    MissingHost,

    #[error("URL has no port and its scheme has no default one")]
    MissingPort,
}
