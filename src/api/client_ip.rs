//! Client IP extraction from HTTP headers
//!
//! Visits are attributed to the address in X-Forwarded-For when a proxy
//! supplied one, falling back to the socket remote address. The address
//! is only ever used as a unique-visitor de-duplication key.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client IP address for a request.
///
/// Takes the first parseable address in `X-Forwarded-For` (the
/// originating client in the proxy chain), or `socket_addr` when the
/// header is absent or carries no valid address.
pub fn extract_client_ip(headers: &HeaderMap, socket_addr: IpAddr) -> IpAddr {
    extract_from_x_forwarded_for(headers).unwrap_or(socket_addr)
}

fn extract_from_x_forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;
    xff.split(',')
        .find_map(|entry| entry.trim().parse::<IpAddr>().ok())
}
