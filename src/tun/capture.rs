//! A tun builder that records directives instead of applying them.
//!
//! Lets the client log, display, or validate the intended tunnel state before
//! (or instead of) committing it to the OS.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use super::builder::TunBuilder;
use super::rgflags::RedirectGatewayFlags;

pub const DEFAULT_MTU: i32 = 1500;

fn ipv6_suffix(ipv6: bool) -> &'static str {
    if ipv6 {
        " [IPv6]"
    } else {
        ""
    }
}

/// Real address of the VPN server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAddress {
    pub address: String,
    pub ipv6: bool,
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, ipv6_suffix(self.ipv6))
    }
}

/// Redirect-gateway state. The server address passed alongside it is not kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerouteGw {
    pub ipv4: bool,
    pub ipv6: bool,
    pub flags: u32,
}

impl RerouteGw {
    /// Render with a caller-supplied flag formatter.
    pub fn render_with<F>(&self, format_flags: F) -> String
    where
        F: Fn(u32) -> String,
    {
        format!(
            "IPv4={}  IPv6={} flags={}",
            u8::from(self.ipv4),
            u8::from(self.ipv6),
            format_flags(self.flags)
        )
    }
}

impl fmt::Display for RerouteGw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(RedirectGatewayFlags::format))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub address: String,
    pub prefix_length: i32,
    pub ipv6: bool,
}

impl Route {
    pub fn new(address: impl Into<String>, prefix_length: i32, ipv6: bool) -> Self {
        Self {
            address: address.into(),
            prefix_length,
            ipv6,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}{}",
            self.address,
            self.prefix_length,
            ipv6_suffix(self.ipv6)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsServer {
    pub address: String,
    pub ipv6: bool,
}

impl fmt::Display for DnsServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, ipv6_suffix(self.ipv6))
    }
}

/// Domain suffix whose DNS requests should be routed through the tunnel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDomain {
    pub domain: String,
}

impl fmt::Display for SearchDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}

/// Snapshot of every directive received during one negotiation pass.
///
/// Scalars are last-write-wins; lists only grow, in call order. Not meant for
/// concurrent mutation: the driver calls the setters serially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunBuilderCapture {
    pub session_name: String,
    pub mtu: i32,
    pub remote_address: RemoteAddress,
    /// Local tunnel addresses.
    pub tunnel_addresses: Vec<Route>,
    pub reroute_gw: RerouteGw,
    /// Routes that should be added to the tunnel.
    pub add_routes: Vec<Route>,
    /// Routes that should be excluded from the tunnel.
    pub exclude_routes: Vec<Route>,
    pub dns_servers: Vec<DnsServer>,
    pub search_domains: Vec<SearchDomain>,
}

impl Default for TunBuilderCapture {
    fn default() -> Self {
        Self {
            session_name: String::new(),
            mtu: DEFAULT_MTU,
            remote_address: RemoteAddress::default(),
            tunnel_addresses: Vec::new(),
            reroute_gw: RerouteGw::default(),
            add_routes: Vec::new(),
            exclude_routes: Vec::new(),
            dns_servers: Vec::new(),
            search_domains: Vec::new(),
        }
    }
}

impl TunBuilderCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Line-oriented dump of the snapshot, using the built-in redirect-gateway
    /// flag names.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_with(RedirectGatewayFlags::format)
    }

    /// Same layout as [`render`](Self::render) with a custom flag formatter.
    pub fn render_with<F>(&self, format_flags: F) -> String
    where
        F: Fn(u32) -> String,
    {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Session Name: {}", self.session_name);
        let _ = writeln!(out, "MTU: {}", self.mtu);
        let _ = writeln!(out, "Remote Address: {}", self.remote_address);
        render_list(&mut out, "Tunnel Addresses", &self.tunnel_addresses);
        let _ = writeln!(
            out,
            "Reroute Gateway: {}",
            self.reroute_gw.render_with(format_flags)
        );
        render_list(&mut out, "Add Routes", &self.add_routes);
        render_list(&mut out, "Exclude Routes", &self.exclude_routes);
        render_list(&mut out, "DNS Servers", &self.dns_servers);
        render_list(&mut out, "Search Domains", &self.search_domains);
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn render_list<T: fmt::Display>(out: &mut String, title: &str, entries: &[T]) {
    let _ = writeln!(out, "{}:", title);
    for entry in entries {
        let _ = writeln!(out, "  {}", entry);
    }
}

impl fmt::Display for TunBuilderCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TunBuilder for TunBuilderCapture {
    fn set_remote_address(&mut self, address: &str, ipv6: bool) -> bool {
        self.remote_address = RemoteAddress {
            address: address.to_string(),
            ipv6,
        };
        true
    }

    fn add_address(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        self.tunnel_addresses
            .push(Route::new(address, prefix_length, ipv6));
        true
    }

    fn reroute_gw(
        &mut self,
        _server_address: &str,
        _server_address_ipv6: bool,
        ipv4: bool,
        ipv6: bool,
        flags: u32,
    ) -> bool {
        self.reroute_gw = RerouteGw { ipv4, ipv6, flags };
        true
    }

    fn add_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        self.add_routes.push(Route::new(address, prefix_length, ipv6));
        true
    }

    fn exclude_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        self.exclude_routes
            .push(Route::new(address, prefix_length, ipv6));
        true
    }

    fn add_dns_server(&mut self, address: &str, ipv6: bool) -> bool {
        self.dns_servers.push(DnsServer {
            address: address.to_string(),
            ipv6,
        });
        true
    }

    fn add_search_domain(&mut self, domain: &str) -> bool {
        self.search_domains.push(SearchDomain {
            domain: domain.to_string(),
        });
        true
    }

    // No range check: zero or negative values are left for the consumer to reject.
    fn set_mtu(&mut self, mtu: i32) -> bool {
        self.mtu = mtu;
        true
    }

    fn set_session_name(&mut self, name: &str) -> bool {
        self.session_name = name.to_string();
        true
    }
}
