use mockall::automock;
use socket2::Domain;
use socket2::Protocol;
use socket2::Socket;
use socket2::Type;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::net::SocketAddrV4;
use std::net::UdpSocket;
use std::time::Duration;

/// One round trip of a broadcast probe.
#[automock]
pub trait BroadcastProbe {
    /// Sends `message` from `local_ip` and waits for a single reply.
    ///
    /// Returns `None` if nothing arrives before the timeout.
    fn probe(&self, local_ip: Ipv4Addr, message: &[u8]) -> std::io::Result<Option<Vec<u8>>>;
}

pub struct Socket2BroadcastProbe {
    destination: SocketAddrV4,
    timeout: Duration,
    buffer_size: usize,
}

impl Socket2BroadcastProbe {
    pub fn new(destination: SocketAddrV4, timeout: Duration, buffer_size: usize) -> Self {
        Self {
            destination,
            timeout,
            buffer_size,
        }
    }

    fn new_socket(&self, local_ip: Ipv4Addr) -> std::io::Result<UdpSocket> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_broadcast(true)?;
        socket.set_reuse_address(true)?;
        socket.set_read_timeout(Some(self.timeout))?;
        socket.bind(&SocketAddrV4::new(local_ip, 0).into())?;
        let socket: UdpSocket = socket.into();
        log::debug!("Created broadcast socket at {}", socket.local_addr()?);
        Ok(socket)
    }
}

impl BroadcastProbe for Socket2BroadcastProbe {
    fn probe(&self, local_ip: Ipv4Addr, message: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
        let socket = self.new_socket(local_ip)?;
        socket.send_to(message, self.destination)?;

        let mut buffer = vec![0; self.buffer_size];
        match socket.recv(&mut buffer) {
            Ok(receive_size) => {
                buffer.truncate(receive_size);
                Ok(Some(buffer))
            }
            Err(e) if is_timeout(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// Unix reports an expired read timeout as `WouldBlock`, Windows as `TimedOut`.
fn is_timeout(error: &std::io::Error) -> bool {
    matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
