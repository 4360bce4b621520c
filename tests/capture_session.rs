use std::sync::{Arc, Mutex};
use std::thread;

use tuncap::stats::{error_handler, StatKind};
use tuncap::tun::capture::Route;
use tuncap::tun::{directive, TracingTunBuilder, TunBuilder, TunDirective};
use tuncap::{ClientSession, TunBuilderCapture};

/// A driver only sees the capability, never the concrete builder.
fn negotiate(builder: &mut dyn TunBuilder) -> bool {
    builder.set_session_name("edge-1")
        && builder.set_remote_address("203.0.113.20", false)
        && builder.add_address("10.66.0.2", 24, false)
        && builder.add_address("fd66::2", 64, true)
        && builder.reroute_gw("203.0.113.20", false, true, true, 0x13)
        && builder.add_dns_server("10.66.0.1", false)
        && builder.add_search_domain("edge.example")
        && builder.set_mtu(1360)
}

#[test]
fn driver_runs_against_any_builder_variant() {
    let mut plain = TunBuilderCapture::new();
    assert!(negotiate(&mut plain));

    let mut traced = TracingTunBuilder::new(TunBuilderCapture::new());
    assert!(negotiate(&mut traced));

    assert_eq!(plain, traced.into_inner());
    assert_eq!(
        plain.tunnel_addresses,
        vec![
            Route::new("10.66.0.2", 24, false),
            Route::new("fd66::2", 64, true)
        ]
    );
    assert!(plain
        .render()
        .contains("Reroute Gateway: IPv4=1  IPv6=1 flags=[ ENABLE REROUTE_GW DEF1 ]\n"));
}

#[test]
fn replayed_directives_match_direct_calls() {
    let directives = vec![
        TunDirective::SetSessionName {
            name: "edge-1".to_string(),
        },
        TunDirective::SetRemoteAddress {
            address: "203.0.113.20".to_string(),
            ipv6: false,
        },
        TunDirective::AddAddress {
            address: "10.66.0.2".to_string(),
            prefix_length: 24,
            ipv6: false,
        },
        TunDirective::AddAddress {
            address: "fd66::2".to_string(),
            prefix_length: 64,
            ipv6: true,
        },
        TunDirective::RerouteGw {
            server_address: "203.0.113.20".to_string(),
            server_address_ipv6: false,
            ipv4: true,
            ipv6: true,
            flags: 0x13,
        },
        TunDirective::AddDnsServer {
            address: "10.66.0.1".to_string(),
            ipv6: false,
        },
        TunDirective::AddSearchDomain {
            domain: "edge.example".to_string(),
        },
        TunDirective::SetMtu { mtu: 1360 },
    ];

    let mut replayed = TunBuilderCapture::new();
    assert_eq!(directive::replay(&mut replayed, &directives).unwrap(), 8);

    let mut direct = TunBuilderCapture::new();
    assert!(negotiate(&mut direct));
    assert_eq!(replayed.render(), direct.render());
}

#[test]
fn session_counts_traffic_from_worker_threads() {
    let errors: Arc<Mutex<Vec<usize>>> = Arc::default();
    let sink = Arc::clone(&errors);
    let session = ClientSession::new(error_handler(move |error_type, _| {
        sink.lock().unwrap().push(error_type);
    }));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let stats = session.stats_handle();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    stats.inc(StatKind::BytesIn, 1);
                    stats.inc(StatKind::TunBytesOut, 2);
                }
                stats.error(1, Some("read timeout"));
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let snapshot = session.stats.snapshot();
    assert_eq!(snapshot.bytes_in, 4_000);
    assert_eq!(snapshot.tun_bytes_out, 8_000);
    assert_eq!(snapshot.bytes_out, 0);
    assert_eq!(*errors.lock().unwrap(), vec![1, 1, 1, 1]);
}
