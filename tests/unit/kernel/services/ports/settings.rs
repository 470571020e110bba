use super::*;

#[test]
fn test_path_list_round_trip_keeps_order() {
    let paths = vec!["/ws/b.md".to_string(), "/ws/a.md".to_string()];
    let encoded = encode_path_list(&paths);
    assert_eq!(decode_path_list(&encoded), paths);
}

#[test]
fn test_corrupt_path_list_decodes_empty() {
    assert!(decode_path_list("not json").is_empty());
    assert!(decode_path_list("{\"a\":1}").is_empty());
}
