//! Estrazione dell'IP del client per la geolocalizzazione
//!
//! Gli indirizzi privati, di loopback e link-local non vengono mai inviati
//! ai servizi esterni: al loro posto si usa "unknown".

use axum::http::HeaderMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const UNKNOWN_IP: &str = "unknown";

/// IP pubblico del client: primo hop di X-Forwarded-For, poi X-Real-IP, poi l'indirizzo della connessione.
pub fn client_ip(headers: &HeaderMap, remote: Option<IpAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let candidate = match forwarded.or(real_ip) {
        Some(raw) => parse_ip(raw),
        None => remote,
    };

    match candidate {
        Some(ip) if is_public(&ip) => ip.to_string(),
        _ => UNKNOWN_IP.to_string(),
    }
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("::ffff:")
        .or_else(|| raw.strip_prefix("::FFFF:"))
        .unwrap_or(raw);
    let ip: IpAddr = raw.parse().ok()?;
    Some(match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    })
}

pub fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(&v4),
            None => is_public_v6(v6),
        },
    }
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast())
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let link_local = first & 0xffc0 == 0xfe80;
    let unique_local = first & 0xfe00 == 0xfc00;
    !(ip.is_loopback() || ip.is_unspecified() || link_local || unique_local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn first_forwarded_hop_wins() {
        let h = headers("x-forwarded-for", "93.184.216.34, 10.0.0.1");
        assert_eq!(client_ip(&h, None), "93.184.216.34");
    }

    #[test]
    fn ipv4_mapped_prefix_is_stripped() {
        let h = headers("x-forwarded-for", "::ffff:93.184.216.34");
        assert_eq!(client_ip(&h, None), "93.184.216.34");
    }

    #[test]
    fn private_and_local_addresses_are_never_exposed() {
        for raw in [
            "10.1.2.3",
            "192.168.1.20",
            "172.16.0.1",
            "172.31.255.255",
            "127.0.0.1",
            "::1",
            "fe80::1",
            "fc00::1",
            "fd12:3456::1",
            "::ffff:192.168.0.5",
        ] {
            let h = headers("x-forwarded-for", raw);
            assert_eq!(client_ip(&h, None), UNKNOWN_IP, "{raw} should be hidden");
        }
    }

    #[test]
    fn addresses_just_outside_private_ranges_are_public() {
        let h = headers("x-forwarded-for", "172.32.0.1");
        assert_eq!(client_ip(&h, None), "172.32.0.1");
    }

    #[test]
    fn falls_back_to_real_ip_then_remote_address() {
        let h = headers("x-real-ip", "8.8.8.8");
        assert_eq!(client_ip(&h, None), "8.8.8.8");

        let remote: IpAddr = "1.1.1.1".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(remote)), "1.1.1.1");
        assert_eq!(client_ip(&HeaderMap::new(), None), UNKNOWN_IP);
    }

    #[test]
    fn garbage_header_is_unknown() {
        let h = headers("x-forwarded-for", "not-an-ip");
        assert_eq!(client_ip(&h, None), UNKNOWN_IP);
    }
}
