//! Property tests for node address invariants.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use nodecore::network::{decode, encode, WIRE_LEN};
use nodecore::NodeAddress;
use proptest::prelude::*;

fn any_ip() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|o| IpAddr::V4(Ipv4Addr::from(o))),
        any::<[u8; 16]>().prop_map(|o| IpAddr::V6(Ipv6Addr::from(o))),
    ]
}

fn any_node() -> impl Strategy<Value = NodeAddress> {
    prop_oneof![
        1 => Just(NodeAddress::VIRTUAL),
        8 => (any_ip(), any::<u16>())
            .prop_map(|(ip, port)| NodeAddress::from(SocketAddr::new(ip, port))),
    ]
}

proptest! {
    #[test]
    fn dotted_decimal_round_trips(octets in any::<[u8; 4]>()) {
        let text = Ipv4Addr::from(octets).to_string();
        let mut addr = NodeAddress::new();
        addr.set_ip(&text).unwrap();
        prop_assert_eq!(addr.ip_string(), text);
    }

    #[test]
    fn ipv6_canonical_text_round_trips(octets in any::<[u8; 16]>()) {
        let text = Ipv6Addr::from(octets).to_string();
        let addr = NodeAddress::with_ip_port(&text, 0).unwrap();
        prop_assert_eq!(addr.ip_string(), text);
    }

    #[test]
    fn port_round_trips(port in any::<u16>()) {
        let mut addr = NodeAddress::new();
        addr.set_port(port);
        prop_assert_eq!(addr.port(), port);
        prop_assert_eq!(addr.is_virtual(), port == 0);
    }

    #[test]
    fn construction_paths_are_byte_identical(ip in any_ip(), port in any::<u16>()) {
        let native = NodeAddress::from(SocketAddr::new(ip, port));
        let mut setters = NodeAddress::new();
        setters.set_ip(&ip.to_string()).unwrap();
        setters.set_port(port);
        prop_assert_eq!(native.as_bytes(), setters.as_bytes());
        prop_assert_eq!(native, setters);
    }

    #[test]
    fn non_virtual_when_anything_set(ip in any_ip(), port in any::<u16>()) {
        let addr = NodeAddress::from(SocketAddr::new(ip, port));
        // A concrete family is never the virtual node
        prop_assert!(!addr.is_virtual());
        prop_assert_eq!(addr.is_any(), ip.is_unspecified() && port == 0);
    }

    #[test]
    fn ordering_is_total(a in any_node(), b in any_node()) {
        let relations = [a < b, a == b, b < a];
        prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
        prop_assert_eq!(a != b, !(a == b));
        prop_assert_eq!(a > b, b < a);
    }

    #[test]
    fn print_parses_back(a in any_node(), port in any::<u16>()) {
        prop_assert_eq!(a.print().parse::<NodeAddress>().unwrap(), a);

        let mut port_only = NodeAddress::new();
        port_only.set_port(port);
        prop_assert_eq!(port_only.print().parse::<NodeAddress>().unwrap(), port_only);
    }

    #[test]
    fn ordering_is_transitive(a in any_node(), b in any_node(), c in any_node()) {
        if a < b && b < c {
            prop_assert!(a < c);
        }
    }

    #[test]
    fn wire_order_matches_value_order(a in any_node(), b in any_node()) {
        let mut ea = Vec::with_capacity(WIRE_LEN);
        let mut eb = Vec::with_capacity(WIRE_LEN);
        encode(&a, &mut ea);
        encode(&b, &mut eb);
        prop_assert_eq!(ea.cmp(&eb), a.cmp(&b));
        prop_assert_eq!(decode(&mut &ea[..]).unwrap(), a);
    }
}

#[test]
fn malformed_ip_fails() {
    let mut addr = NodeAddress::new();
    assert!(addr.set_ip("999.999.999.999").is_err());
    assert!(addr.is_virtual());
}
