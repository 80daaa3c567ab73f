use if_addrs::IfAddr;
use if_addrs::Interface;
use mockall::automock;
use std::net::Ipv4Addr;

/// Lists the IPv4 addresses this host can send broadcast probes from.
///
/// Loopback addresses (e.g. `127.0.1.1`, which the host name often resolves to) are not included,
/// since a broadcast sent from them never leaves the host.
#[automock]
pub trait InterfaceScanner {
    fn scan(&self) -> std::io::Result<Vec<Ipv4Addr>>;
}

/// Scans network interfaces of the operating system.
pub struct IfAddrsInterfaceScanner;

impl IfAddrsInterfaceScanner {
    fn filter_addresses(interfaces: Vec<Interface>) -> Vec<Ipv4Addr> {
        interfaces
            .into_iter()
            .filter_map(|i| match i.addr {
                IfAddr::V4(addr) if !addr.ip.is_loopback() => Some(addr.ip),
                IfAddr::V4(_) => {
                    log::debug!("Skipping loopback interface {}", i.name);
                    None
                }
                IfAddr::V6(_) => None,
            })
            .collect()
    }
}

impl InterfaceScanner for IfAddrsInterfaceScanner {
    fn scan(&self) -> std::io::Result<Vec<Ipv4Addr>> {
        let addresses = Self::filter_addresses(if_addrs::get_if_addrs()?);
        log::info!("Local IPv4 addresses: {:?}", &addresses);
        Ok(addresses)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scan() {
        crate::test::init();

        let addresses = IfAddrsInterfaceScanner.scan().unwrap();

        assert!(
            addresses.iter().all(|a| !a.is_loopback()),
            "Loopback addresses must be skipped"
        );
    }
}
