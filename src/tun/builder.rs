use tracing::debug;

use super::rgflags::RedirectGatewayFlags;

/// The set of calls a tunnel-negotiation driver makes to configure a virtual
/// interface. Each call returns `true` when the directive was accepted.
///
/// Implementations either apply the directive to the OS or record it; the
/// driver picks one at composition time and never needs to know which.
pub trait TunBuilder {
    fn set_remote_address(&mut self, address: &str, ipv6: bool) -> bool;

    fn add_address(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool;

    /// `server_address` names the VPN server so a real builder can keep a
    /// host route to it outside the tunnel.
    fn reroute_gw(
        &mut self,
        server_address: &str,
        server_address_ipv6: bool,
        ipv4: bool,
        ipv6: bool,
        flags: u32,
    ) -> bool;

    fn add_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool;

    fn exclude_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool;

    fn add_dns_server(&mut self, address: &str, ipv6: bool) -> bool;

    fn add_search_domain(&mut self, domain: &str) -> bool;

    fn set_mtu(&mut self, mtu: i32) -> bool;

    fn set_session_name(&mut self, name: &str) -> bool;
}

/// Lets a driver borrow a builder that something else owns.
impl<B: TunBuilder + ?Sized> TunBuilder for &mut B {
    fn set_remote_address(&mut self, address: &str, ipv6: bool) -> bool {
        (**self).set_remote_address(address, ipv6)
    }

    fn add_address(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        (**self).add_address(address, prefix_length, ipv6)
    }

    fn reroute_gw(
        &mut self,
        server_address: &str,
        server_address_ipv6: bool,
        ipv4: bool,
        ipv6: bool,
        flags: u32,
    ) -> bool {
        (**self).reroute_gw(server_address, server_address_ipv6, ipv4, ipv6, flags)
    }

    fn add_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        (**self).add_route(address, prefix_length, ipv6)
    }

    fn exclude_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        (**self).exclude_route(address, prefix_length, ipv6)
    }

    fn add_dns_server(&mut self, address: &str, ipv6: bool) -> bool {
        (**self).add_dns_server(address, ipv6)
    }

    fn add_search_domain(&mut self, domain: &str) -> bool {
        (**self).add_search_domain(domain)
    }

    fn set_mtu(&mut self, mtu: i32) -> bool {
        (**self).set_mtu(mtu)
    }

    fn set_session_name(&mut self, name: &str) -> bool {
        (**self).set_session_name(name)
    }
}

fn family(ipv6: bool) -> &'static str {
    if ipv6 {
        "ipv6"
    } else {
        "ipv4"
    }
}

/// Wraps another builder, logging every directive before forwarding it.
pub struct TracingTunBuilder<B> {
    inner: B,
}

impl<B: TunBuilder> TracingTunBuilder<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: TunBuilder> TunBuilder for TracingTunBuilder<B> {
    fn set_remote_address(&mut self, address: &str, ipv6: bool) -> bool {
        debug!(address = ?address, family = family(ipv6), "tun_set_remote_address");
        self.inner.set_remote_address(address, ipv6)
    }

    fn add_address(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        debug!(address = ?address, prefix_length, family = family(ipv6), "tun_add_address");
        self.inner.add_address(address, prefix_length, ipv6)
    }

    fn reroute_gw(
        &mut self,
        server_address: &str,
        server_address_ipv6: bool,
        ipv4: bool,
        ipv6: bool,
        flags: u32,
    ) -> bool {
        debug!(
            server_address = ?server_address,
            server_family = family(server_address_ipv6),
            ipv4,
            ipv6,
            flags = %RedirectGatewayFlags(flags),
            "tun_reroute_gw"
        );
        self.inner
            .reroute_gw(server_address, server_address_ipv6, ipv4, ipv6, flags)
    }

    fn add_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        debug!(address = ?address, prefix_length, family = family(ipv6), "tun_add_route");
        self.inner.add_route(address, prefix_length, ipv6)
    }

    fn exclude_route(&mut self, address: &str, prefix_length: i32, ipv6: bool) -> bool {
        debug!(address = ?address, prefix_length, family = family(ipv6), "tun_exclude_route");
        self.inner.exclude_route(address, prefix_length, ipv6)
    }

    fn add_dns_server(&mut self, address: &str, ipv6: bool) -> bool {
        debug!(address = ?address, family = family(ipv6), "tun_add_dns_server");
        self.inner.add_dns_server(address, ipv6)
    }

    fn add_search_domain(&mut self, domain: &str) -> bool {
        debug!(domain = ?domain, "tun_add_search_domain");
        self.inner.add_search_domain(domain)
    }

    fn set_mtu(&mut self, mtu: i32) -> bool {
        debug!(mtu, "tun_set_mtu");
        self.inner.set_mtu(mtu)
    }

    fn set_session_name(&mut self, name: &str) -> bool {
        debug!(name = ?name, "tun_set_session_name");
        self.inner.set_session_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{TracingTunBuilder, TunBuilder};
    use crate::tun::capture::TunBuilderCapture;

    #[test]
    fn tracing_builder_forwards_to_inner() {
        let mut builder = TracingTunBuilder::new(TunBuilderCapture::new());
        assert!(builder.set_session_name("office"));
        assert!(builder.set_mtu(1400));
        assert!(builder.add_route("10.8.0.0", 16, false));
        assert!(builder.reroute_gw("198.51.100.7", false, true, false, 3));

        let capture = builder.into_inner();
        assert_eq!(capture.session_name, "office");
        assert_eq!(capture.mtu, 1400);
        assert_eq!(capture.add_routes.len(), 1);
        assert!(capture.reroute_gw.ipv4);
        assert_eq!(capture.reroute_gw.flags, 3);
    }

    #[test]
    fn tracing_builder_over_borrowed_capture_forwards_every_call() {
        let mut capture = TunBuilderCapture::new();
        {
            let mut builder = TracingTunBuilder::new(&mut capture);
            assert!(builder.set_remote_address("2001:db8::7", true));
            assert!(builder.add_address("10.8.0.2", 24, false));
            assert!(builder.reroute_gw("2001:db8::7", true, true, true, 0x13));
            assert!(builder.add_route("10.0.0.0", 8, false));
            assert!(builder.exclude_route("2001:db8::7", 128, true));
            assert!(builder.add_dns_server("10.8.0.1", false));
            assert!(builder.add_search_domain("lab.example"));
            assert!(builder.set_mtu(1280));
            assert!(builder.set_session_name("borrowed"));
        }

        let rendered = capture.render();
        assert!(rendered.contains("Remote Address: 2001:db8::7 [IPv6]\n"));
        assert!(rendered.contains("Reroute Gateway: IPv4=1  IPv6=1 flags=[ ENABLE REROUTE_GW DEF1 ]\n"));
        assert!(rendered.contains("Exclude Routes:\n  2001:db8::7/128 [IPv6]\n"));
        assert!(rendered.contains("Search Domains:\n  lab.example\n"));
        assert_eq!(capture.session_name, "borrowed");
        assert_eq!(capture.mtu, 1280);
    }
}
