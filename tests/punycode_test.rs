//! RFC 3492 codec tests.
//!
//! Covers:
//! - Reference vectors from RFC 3492 §7.1
//! - Encode/decode round trips
//! - The trailing-delimiter behavior on all-ASCII input

use pagenet::host::punycode;

#[test]
fn test_reference_vector_kva() {
    assert_eq!(punycode::encode("bücher").as_deref(), Some("bcher-kva"));
}

#[test]
fn test_rfc_vectors() {
    // (input, expected) pairs from RFC 3492 §7.1.
    let cases: &[(&str, &str)] = &[
        // (C) Chinese (traditional)
        (
            "\u{4ED6}\u{5011}\u{7232}\u{4EC0}\u{9EBD}\u{4E0D}\u{8AAA}\u{4E2D}\u{6587}",
            "ihqwctvzc91f659drss3x8bo0yb",
        ),
        // (D) Czech
        (
            "Pro\u{10D}prost\u{11B}nemluv\u{ED}\u{10D}esky",
            "Proprostnemluvesky-uyb24dma41a",
        ),
        // (I) Russian
        (
            "\u{043F}\u{043E}\u{0447}\u{0435}\u{043C}\u{0443}\u{0436}\u{0435}\u{043E}\u{043D}\
             \u{0438}\u{043D}\u{0435}\u{0433}\u{043E}\u{0432}\u{043E}\u{0440}\u{044F}\u{0442}\
             \u{043F}\u{043E}\u{0440}\u{0443}\u{0441}\u{0441}\u{043A}\u{0438}",
            "b1abfaaepdrnnbgefbadotcwatmq2g4l",
        ),
        // (O) <sono><supiido><de>
        ("\u{305D}\u{306E}\u{30B9}\u{30D4}\u{30FC}\u{30C9}\u{3067}", "d9juau41awczczp"),
    ];

    for (input, expected) in cases {
        assert_eq!(punycode::encode(input).as_deref(), Some(*expected));
        assert_eq!(punycode::decode(expected).as_deref(), Some(*input));
    }
}

#[test]
fn test_all_ascii_input_gains_trailing_delimiter() {
    // The raw bootstring algorithm is not identity on ASCII input; this is
    // exactly why DomainName leaves ASCII labels alone.
    assert_eq!(punycode::encode("example").as_deref(), Some("example-"));
}

#[test]
fn test_round_trip() {
    for label in ["ü", "bücher", "παράδειγμα", "例え", "العربية"] {
        let encoded = punycode::encode(label).unwrap();
        assert_eq!(punycode::decode(&encoded).as_deref(), Some(label));
    }
}

#[test]
fn test_decode_rejects_invalid_digit() {
    assert_eq!(punycode::decode("x-_"), None);
}
