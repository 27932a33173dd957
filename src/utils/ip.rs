//! 客户端 IP 提取（登录限流的 key）
//!
//! 只有当连接来自配置的可信代理时才采信 X-Forwarded-For / X-Real-IP，
//! 否则一律使用 TCP 对端地址。

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;

/// 解析 `ip` 或 `ip:port`
fn parse_ip(value: &str) -> Option<IpAddr> {
    value
        .parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| value.parse::<IpAddr>())
        .ok()
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(prefix_len), Ok(network)) = (prefix_len.parse::<u32>(), network.parse::<IpAddr>())
    else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// 检查 IP 是否在可信代理列表中（单 IP 或 CIDR）
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Some(ip) = parse_ip(ip) else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip)
        }
    })
}

/// 从请求头提取转发的原始客户端 IP
pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

/// 决定限流使用的客户端标识
pub fn client_key(
    peer_addr: Option<&str>,
    forwarded: Option<String>,
    trusted_proxies: &[String],
) -> Option<String> {
    let peer = peer_addr?;
    if !trusted_proxies.is_empty() && is_trusted_proxy(peer, trusted_proxies) {
        return Some(forwarded.unwrap_or_else(|| peer.to_string()));
    }
    Some(peer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    #[test]
    fn test_ip_in_cidr() {
        let v4: IpAddr = "192.168.1.100".parse().unwrap();
        assert!(ip_in_cidr(&v4, "192.168.1.0/24"));
        assert!(!ip_in_cidr(&v4, "10.0.0.0/8"));
        assert!(!ip_in_cidr(&v4, "192.168.1.0/40"));

        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(ip_in_cidr(&v6, "2001:db8::/32"));
        assert!(!ip_in_cidr(&v6, "192.168.1.0/24"));
    }

    #[test]
    fn test_client_key_ignores_forwarded_from_untrusted_peer() {
        let trusted = vec!["10.0.0.0/8".to_string()];

        assert_eq!(
            client_key(Some("8.8.8.8"), Some("1.2.3.4".into()), &trusted).as_deref(),
            Some("8.8.8.8")
        );
        assert_eq!(
            client_key(Some("10.1.2.3"), Some("1.2.3.4".into()), &trusted).as_deref(),
            Some("1.2.3.4")
        );
        assert_eq!(
            client_key(Some("10.1.2.3"), None, &[]).as_deref(),
            Some("10.1.2.3")
        );
        assert_eq!(client_key(None, Some("1.2.3.4".into()), &trusted), None);
    }

    #[test]
    fn test_forwarded_ip_prefers_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("203.0.113.7"));

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-real-ip"),
            HeaderValue::from_static("198.51.100.4"),
        );
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("198.51.100.4"));
    }
}
