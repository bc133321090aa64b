use readout_core::errors::ReadoutError;
use readout_core::rng::RngHandle;
use readout_mag::{
    from_bytes, from_json, random_histogram, to_bytes, to_json, total_magnetization,
    CountsHistogram,
};

#[test]
fn wrapped_json_round_trip() {
    let mut rng = RngHandle::from_seed(8);
    let histogram = random_histogram(6, 20, 99, &mut rng).unwrap();

    let json = to_json(&histogram).unwrap();
    let decoded = from_json(&json).unwrap();

    assert_eq!(decoded, histogram);
}

#[test]
fn export_writes_the_wrapped_layout_with_padded_keys() {
    let mut histogram = CountsHistogram::new(4).unwrap();
    histogram.record("0001", 3).unwrap();
    histogram.record("1000", 1).unwrap();

    let json = to_json(&histogram).unwrap();

    assert!(json.contains("\"bitstring_size\": 4"));
    assert!(json.contains("\"0001\""));
    assert!(json.contains("\"1000\""));
}

#[test]
fn bare_map_ingest_infers_the_key_length() {
    let histogram = from_json(r#"{"0000": 12, "0101": 3, "0110": 5}"#).unwrap();

    assert_eq!(histogram.bit_length(), 4);
    assert_eq!(histogram.total_count(), 20);
    assert!((total_magnetization(&histogram) - (-2.4)).abs() < 1e-12);
}

#[test]
fn empty_bare_map_is_the_degenerate_histogram() {
    let histogram = from_json("{}").unwrap();

    assert_eq!(histogram.bit_length(), 0);
    assert_eq!(histogram.num_keys(), 0);
    assert_eq!(total_magnetization(&histogram), 0.0);
}

#[test]
fn wrapped_empty_map_keeps_the_declared_length() {
    let histogram = from_json(r#"{"bitstring_size": 3, "counts": {}}"#).unwrap();

    assert_eq!(histogram.bit_length(), 3);
    assert_eq!(histogram.num_keys(), 0);
}

#[test]
fn inconsistent_bare_keys_are_rejected() {
    let err = from_json(r#"{"01": 1, "010": 2}"#).unwrap_err();

    assert!(matches!(err, ReadoutError::MalformedHistogram(_)));
    assert_eq!(err.info().code, "key-length-mismatch");
}

#[test]
fn wrapped_key_shorter_than_declared_is_rejected() {
    let err = from_json(r#"{"bitstring_size": 4, "counts": {"010": 1}}"#).unwrap_err();

    assert!(matches!(err, ReadoutError::MalformedHistogram(_)));
    assert_eq!(err.info().context.get("expected"), Some(&"4".to_string()));
}

#[test]
fn sign_prefixed_keys_are_rejected() {
    let err = from_json(r#"{"bitstring_size": 2, "counts": {"+1": 1}}"#).unwrap_err();

    assert_eq!(err.info().code, "invalid-key-char");
}

#[test]
fn oversized_declared_length_is_rejected() {
    let err = from_json(r#"{"bitstring_size": 70, "counts": {}}"#).unwrap_err();

    assert_eq!(err.info().code, "bit-length-range");
}

#[test]
fn binary_envelope_round_trip() {
    let mut rng = RngHandle::from_seed(29);
    let histogram = random_histogram(10, 50, 200, &mut rng).unwrap();

    let bytes = to_bytes(&histogram).unwrap();
    let decoded = from_bytes(&bytes).unwrap();

    assert_eq!(decoded, histogram);
}

#[test]
fn malformed_payloads_surface_serde_errors() {
    let err = from_json("not json").unwrap_err();
    assert!(matches!(err, ReadoutError::Serde(_)));

    let err = from_json("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, ReadoutError::Serde(_)));
    assert_eq!(err.info().code, "json-deserialize");

    let err = from_bytes(&[0xff, 0xff]).unwrap_err();
    assert!(matches!(err, ReadoutError::Serde(_)));
}

#[test]
fn negative_counts_are_rejected_at_the_wire() {
    let err = from_json(r#"{"bitstring_size": 4, "counts": {"0101": -3}}"#).unwrap_err();

    assert!(matches!(err, ReadoutError::Serde(_)));
    assert_eq!(err.info().code, "json-deserialize");
}
