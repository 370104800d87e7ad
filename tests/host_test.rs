//! Host classification tests.
//!
//! Covers:
//! - IPv4 literal vs. domain classification
//! - The scheme-separator guard
//! - The dotted-quad conformance vector set

use pagenet::host::{DomainNameError, Host, HostError};

#[test]
fn test_ipv4_classification() {
    let host = Host::new("192.168.1.1").unwrap();
    assert!(host.is_ip());
    assert_eq!(host.raw_string(), "192.168.1.1");
}

#[test]
fn test_domain_classification() {
    let host = Host::new("example.com").unwrap();
    assert!(!host.is_ip());
    assert_eq!(host.raw_string(), "example.com");
}

#[test]
fn test_scheme_separator_rejected() {
    assert_eq!(Host::new("https://example.com"), Err(HostError::ContainsScheme));
    assert_eq!(Host::new("ftp://1.2.3.4"), Err(HostError::ContainsScheme));
}

#[test]
fn test_raw_string_never_contains_scheme() {
    for raw in ["example.com", "192.168.1.1", "bücher.example", "a.b.c.d.e"] {
        let host = Host::new(raw).unwrap();
        assert!(!host.raw_string().contains("://"), "{raw}");
    }
}

#[test]
fn test_dotted_quad_conformance_vectors() {
    let addresses = [
        "0.0.0.0",
        "9.9.9.9",
        "10.0.0.1",
        "99.100.101.102",
        "127.0.0.1",
        "199.255.249.0",
        "200.249.255.255",
        "255.255.255.255",
    ];
    for raw in addresses {
        assert!(Host::new(raw).unwrap().is_ip(), "{raw} should classify as an address");
    }

    // All-digit strings that miss the grammar are still valid domain syntax.
    let domains = [
        "256.0.0.1",
        "300.1.1.1",
        "1.2.3",
        "1.2.3.4.5",
        "192.168.01.1",
        "00.1.1.1",
    ];
    for raw in domains {
        let host = Host::new(raw).unwrap();
        assert!(!host.is_ip(), "{raw} should classify as a domain");
    }
}

#[test]
fn test_domain_error_propagates() {
    assert_eq!(
        Host::new("..double"),
        Err(HostError::InvalidDomainName(DomainNameError::DotAtBeginning))
    );
    assert_eq!(
        Host::new(""),
        Err(HostError::InvalidDomainName(DomainNameError::EmptyString))
    );
}

#[test]
fn test_unicode_host_normalized() {
    let host = Host::new("bücher.example").unwrap();
    assert_eq!(host.raw_string(), "xn--bcher-kva.example");
}
