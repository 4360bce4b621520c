use std::fmt;

use serde::{Deserialize, Serialize};

/// Bitmask describing how the default gateway is redirected into the tunnel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedirectGatewayFlags(pub u32);

impl RedirectGatewayFlags {
    pub const ENABLE: u32 = 1 << 0;
    pub const REROUTE_GW: u32 = 1 << 1;
    pub const LOCAL: u32 = 1 << 2;
    pub const AUTO_LOCAL: u32 = 1 << 3;
    pub const DEF1: u32 = 1 << 4;
    pub const BYPASS_DHCP: u32 = 1 << 5;
    pub const BYPASS_DNS: u32 = 1 << 6;
    pub const BLOCK_LOCAL: u32 = 1 << 7;
    pub const IPV4: u32 = 1 << 8;
    pub const IPV6: u32 = 1 << 9;

    const NAMES: [(u32, &'static str); 10] = [
        (Self::ENABLE, "ENABLE"),
        (Self::REROUTE_GW, "REROUTE_GW"),
        (Self::LOCAL, "LOCAL"),
        (Self::AUTO_LOCAL, "AUTO_LOCAL"),
        (Self::DEF1, "DEF1"),
        (Self::BYPASS_DHCP, "BYPASS_DHCP"),
        (Self::BYPASS_DNS, "BYPASS_DNS"),
        (Self::BLOCK_LOCAL, "BLOCK_LOCAL"),
        (Self::IPV4, "IPv4"),
        (Self::IPV6, "IPv6"),
    ];

    /// Names of the set flags in bit order. Unknown bits are skipped.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| name)
    }

    /// Pure formatter suitable for `TunBuilderCapture::render_with`.
    #[must_use]
    pub fn format(flags: u32) -> String {
        Self(flags).to_string()
    }
}

impl fmt::Display for RedirectGatewayFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for name in self.names() {
            write!(f, "{} ", name)?;
        }
        f.write_str("]")
    }
}
