#![cfg(feature = "binary-cache")]

use std::sync::Arc;

use chrono::NaiveDate;
use rulecraft::serial::{decode, encode, DeserializeError};
use rulecraft::{
    always_false, always_true, count, field, lower, match_any, match_none, today_plus, when,
    FieldInfo, FieldModel, Metadata, Rule, TemporalUnit, ValueType,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn simple_rule() -> Rule {
    let age = FieldInfo::new("user.age", ValueType::Integer).readable("age");
    let status = FieldInfo::new("user.status", ValueType::String).readable("status");
    when(field(&age).gte(18).and(field(&status).eq("active")))
}

fn complex_rule() -> Rule {
    let born = FieldInfo::new("user.birthdate", ValueType::Date).readable("born");
    let tags = FieldInfo::new("user.tags", ValueType::List)
        .readable("tags")
        .generic(ValueType::String);
    let score = FieldInfo::new("user.score", ValueType::Float).readable("score");
    when(
        match_any(vec![
            field(&born)
                .plus(18, TemporalUnit::Years)
                .before_or_equals(today_plus(1, TemporalUnit::Days)),
            field(&tags).any_match(["vip", "staff"]),
            !field(&score).gt(90.5),
        ])
        .xor(count(vec![always_true("a"), always_false("b")]).eq(1))
        .or(match_none(vec![field(&tags).contains("it's (odd)")])),
    )
}

fn round_trip(metadata: &Metadata) -> Arc<Metadata> {
    decode(&encode(metadata).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip_simple() {
    let rule = simple_rule();
    let restored = round_trip(rule.metadata());
    assert_eq!(restored.as_ref(), rule.metadata().as_ref());
    assert_eq!(restored.node_count(), rule.metadata().node_count());
}

#[test]
fn round_trip_complex() {
    let rule = complex_rule();
    let restored = round_trip(rule.metadata());
    assert_eq!(restored.as_ref(), rule.metadata().as_ref());
}

#[test]
fn restored_tree_lowers_identically() {
    let rule = complex_rule();
    let restored = round_trip(rule.metadata());
    assert_eq!(lower(&restored).unwrap(), lower(rule.metadata()).unwrap());
}

#[test]
fn evaluated_tree_round_trips() {
    let rule = simple_rule();
    let model = FieldModel::new()
        .with("user.age", 30_i64)
        .with("user.status", "active");
    let result = rule.evaluate(&model);
    let restored = round_trip(result.metadata());
    assert_eq!(restored.as_ref(), result.metadata().as_ref());
    assert_eq!(restored.node_count(), result.outcome().preorder().len());
}

#[test]
fn bare_condition_round_trips() {
    let born = FieldInfo::new("born", ValueType::Date);
    let cond = field(&born).after(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    let restored = round_trip(cond.metadata());
    assert_eq!(restored.as_ref(), cond.metadata().as_ref());
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

#[test]
fn rejects_bad_magic() {
    let mut bytes = encode(simple_rule().metadata()).unwrap();
    bytes[0] = b'X';
    assert!(matches!(decode(&bytes), Err(DeserializeError::BadMagic)));
}

#[test]
fn rejects_other_format_version() {
    let mut bytes = encode(simple_rule().metadata()).unwrap();
    bytes[4..6].copy_from_slice(&99_u16.to_le_bytes());
    assert!(matches!(
        decode(&bytes),
        Err(DeserializeError::IncompatibleVersion { blob: 99, supported: 2 })
    ));
}

#[test]
fn rejects_flipped_payload_byte() {
    let mut bytes = encode(simple_rule().metadata()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(decode(&bytes), Err(DeserializeError::ChecksumMismatch)));
}

#[test]
fn rejects_truncated_blob() {
    let bytes = encode(simple_rule().metadata()).unwrap();
    assert!(matches!(
        decode(&bytes[..bytes.len() - 3]),
        Err(DeserializeError::LengthMismatch { .. })
    ));
    assert!(matches!(
        decode(&bytes[..10]),
        Err(DeserializeError::LengthMismatch { expected: 32, actual: 10 })
    ));
}

#[test]
fn rejects_empty_input() {
    assert!(matches!(
        decode(&[]),
        Err(DeserializeError::LengthMismatch { actual: 0, .. })
    ));
}

#[test]
fn error_messages_are_readable() {
    let err = decode(b"NOPE").unwrap_err();
    assert_eq!(
        err.to_string(),
        "payload length mismatch: expected 32 bytes, got 4"
    );
}
