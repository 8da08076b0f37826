// Listener module
// Binds the dev server socket

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind a non-blocking `TcpListener` with `SO_REUSEADDR` set, so the dev server
/// can be restarted while the old socket sits in `TIME_WAIT`.
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
