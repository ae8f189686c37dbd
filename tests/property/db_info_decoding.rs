//! Property-based tests for tolerant database info decoding
#![allow(deprecated)]

use cloudant_link::{CloudantError, DbInfo};
use proptest::prelude::*;
use serde_json::{json, Value};

fn payload_with_purge_seq(purge_seq: Value) -> Value {
    json!({
        "db_name": "props",
        "doc_count": 1,
        "doc_del_count": "0",
        "update_seq": "1-g1AAAA",
        "purge_seq": purge_seq,
        "compact_running": false,
        "disk_size": 10,
        "instance_start_time": 0,
        "disk_format_version": 8
    })
}

proptest! {
    #[test]
    fn integer_purge_seq_reads_back(n in 0i64..=i64::MAX) {
        let info = DbInfo::from_value(payload_with_purge_seq(json!(n))).unwrap();
        prop_assert_eq!(info.purge_seq(), n);
        prop_assert_eq!(info.string_purge_seq(), n.to_string());
    }

    #[test]
    fn multi_element_array_purge_seq_is_zero(items in prop::collection::vec(any::<i64>(), 2..8)) {
        let array = json!(items);
        let info = DbInfo::from_value(payload_with_purge_seq(array.clone())).unwrap();
        prop_assert_eq!(info.purge_seq(), 0);
        prop_assert_eq!(info.string_purge_seq(), array.to_string());
    }

    #[test]
    fn composite_string_purge_seq_is_opaque(seq in 0u32..100_000, suffix in "[a-zA-Z][a-zA-Z0-9_]{0,40}") {
        let token = format!("{}-{}", seq, suffix);
        let info = DbInfo::from_value(payload_with_purge_seq(json!(token.clone()))).unwrap();
        prop_assert_eq!(info.purge_seq(), 0);
        prop_assert_eq!(info.string_purge_seq(), token);
    }

    #[test]
    fn partitioned_flag_is_carried(partitioned in any::<bool>()) {
        let mut payload = payload_with_purge_seq(json!(0));
        payload["props"] = json!({ "partitioned": partitioned });
        let info = DbInfo::from_value(payload).unwrap();
        prop_assert_eq!(info.props().partitioned(), partitioned);
    }

    #[test]
    fn decoding_is_idempotent(doc_count in any::<u32>(), name in "[a-z][a-z0-9_]{0,20}") {
        let mut payload = payload_with_purge_seq(json!([1, "g1"]));
        payload["db_name"] = json!(name);
        payload["doc_count"] = json!(doc_count);
        let bytes = serde_json::to_vec(&payload).unwrap();
        let first = DbInfo::from_slice(&bytes).unwrap();
        let second = DbInfo::from_slice(&bytes).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn payload_without_db_name_is_malformed(doc_count in any::<u32>()) {
        let payload = json!({ "doc_count": doc_count, "purge_seq": 0 });
        let err = DbInfo::from_value(payload).unwrap_err();
        prop_assert!(matches!(err, CloudantError::MalformedPayload(_)));
    }
}

#[test]
fn test_missing_props_means_not_partitioned() {
    let info = DbInfo::from_value(payload_with_purge_seq(json!(0))).unwrap();
    assert!(!info.props().partitioned());
}

#[test]
fn test_empty_input_is_malformed() {
    assert!(matches!(
        DbInfo::from_slice(b""),
        Err(CloudantError::MalformedPayload(_))
    ));
}
