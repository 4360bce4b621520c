use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};

use super::builder::TunBuilder;

/// One recorded tun builder call, in a form that can be stored and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TunDirective {
    SetRemoteAddress {
        address: String,
        #[serde(default)]
        ipv6: bool,
    },
    AddAddress {
        address: String,
        prefix_length: i32,
        #[serde(default)]
        ipv6: bool,
    },
    RerouteGw {
        #[serde(default)]
        server_address: String,
        #[serde(default)]
        server_address_ipv6: bool,
        #[serde(default)]
        ipv4: bool,
        #[serde(default)]
        ipv6: bool,
        #[serde(default)]
        flags: u32,
    },
    AddRoute {
        address: String,
        prefix_length: i32,
        #[serde(default)]
        ipv6: bool,
    },
    ExcludeRoute {
        address: String,
        prefix_length: i32,
        #[serde(default)]
        ipv6: bool,
    },
    AddDnsServer {
        address: String,
        #[serde(default)]
        ipv6: bool,
    },
    AddSearchDomain {
        domain: String,
    },
    SetMtu {
        mtu: i32,
    },
    SetSessionName {
        name: String,
    },
}

impl TunDirective {
    /// Issue this directive against `builder`, returning the builder's verdict.
    pub fn apply(&self, builder: &mut dyn TunBuilder) -> bool {
        match self {
            Self::SetRemoteAddress { address, ipv6 } => builder.set_remote_address(address, *ipv6),
            Self::AddAddress {
                address,
                prefix_length,
                ipv6,
            } => builder.add_address(address, *prefix_length, *ipv6),
            Self::RerouteGw {
                server_address,
                server_address_ipv6,
                ipv4,
                ipv6,
                flags,
            } => builder.reroute_gw(server_address, *server_address_ipv6, *ipv4, *ipv6, *flags),
            Self::AddRoute {
                address,
                prefix_length,
                ipv6,
            } => builder.add_route(address, *prefix_length, *ipv6),
            Self::ExcludeRoute {
                address,
                prefix_length,
                ipv6,
            } => builder.exclude_route(address, *prefix_length, *ipv6),
            Self::AddDnsServer { address, ipv6 } => builder.add_dns_server(address, *ipv6),
            Self::AddSearchDomain { domain } => builder.add_search_domain(domain),
            Self::SetMtu { mtu } => builder.set_mtu(*mtu),
            Self::SetSessionName { name } => builder.set_session_name(name),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetRemoteAddress { .. } => "set_remote_address",
            Self::AddAddress { .. } => "add_address",
            Self::RerouteGw { .. } => "reroute_gw",
            Self::AddRoute { .. } => "add_route",
            Self::ExcludeRoute { .. } => "exclude_route",
            Self::AddDnsServer { .. } => "add_dns_server",
            Self::AddSearchDomain { .. } => "add_search_domain",
            Self::SetMtu { .. } => "set_mtu",
            Self::SetSessionName { .. } => "set_session_name",
        }
    }
}

/// Apply `directives` in order. Stops at the first directive the builder
/// refuses; returns how many were applied otherwise.
pub fn replay(builder: &mut dyn TunBuilder, directives: &[TunDirective]) -> Result<usize> {
    for (index, directive) in directives.iter().enumerate() {
        if !directive.apply(builder) {
            warn!(index, kind = directive.kind(), "tun_directive_refused");
            return Err(AppError::Directive {
                index,
                directive: directive.kind().to_string(),
            });
        }
        debug!(index, kind = directive.kind(), "tun_directive_applied");
    }
    info!(count = directives.len(), "tun_directives_replayed");
    Ok(directives.len())
}

/// Read a JSON array of directives.
pub fn load_directives(path: &Path) -> Result<Vec<TunDirective>> {
    let json = fs::read_to_string(path)?;
    let directives: Vec<TunDirective> = serde_json::from_str(&json)?;
    Ok(directives)
}
