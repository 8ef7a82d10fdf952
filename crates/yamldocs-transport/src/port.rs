//! Loopback port allocation.

use std::net::{IpAddr, TcpListener};
use std::ops::RangeInclusive;

use tracing::{debug, warn};

use crate::server::StartError;

/// Pick a free port on `ip`.
///
/// Ports in `preferred` are probed in order; when none is free, or no range
/// is given, the OS assigns an ephemeral port. The probe socket is released
/// before returning, so the caller's bind can still lose a race for the port.
pub fn allocate(ip: IpAddr, preferred: Option<&RangeInclusive<u16>>) -> Result<u16, StartError> {
    if let Some(range) = preferred {
        for port in range.clone() {
            if TcpListener::bind((ip, port)).is_ok() {
                debug!("Allocated preferred port {port}");
                return Ok(port);
            }
        }
        warn!(
            "No free port in {}-{}, falling back to an ephemeral port",
            range.start(),
            range.end()
        );
    }

    let probe = TcpListener::bind((ip, 0)).map_err(StartError::Allocation)?;
    let port = probe.local_addr().map_err(StartError::Allocation)?.port();
    debug!("Allocated ephemeral port {port}");
    Ok(port)
}
