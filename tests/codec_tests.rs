//! Tests for the binary codec and entity record layouts
//!
//! These tests verify:
//! - Primitive round trips and the one-byte bool encoding
//! - Sanity bounds on decoded lengths and counts
//! - UTF-8 validation
//! - Fixed field order on entity records

use std::io::Cursor;

use questkv::codec;
use questkv::model::{
    Difficulty, EmailEntry, Exercise, ExerciseType, GraphEdge, Quest, QueueEntry, User,
    WorkoutSession,
};
use questkv::StoreError;

// =============================================================================
// Primitives
// =============================================================================

#[test]
fn test_string_round_trip() {
    let mut buf = Vec::new();
    codec::write_string(&mut buf, "hello quest").unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(codec::read_string(&mut cursor).unwrap(), "hello quest");
}

#[test]
fn test_empty_string_round_trip() {
    let mut buf = Vec::new();
    codec::write_string(&mut buf, "").unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(codec::read_string(&mut cursor).unwrap(), "");
}

#[test]
fn test_string_length_sanity_bound() {
    // Declared length just above the bound, no payload
    let mut buf = Vec::new();
    codec::write_u64(&mut buf, codec::MAX_STRING_LEN + 1).unwrap();

    let mut cursor = Cursor::new(buf);
    let result = codec::read_string(&mut cursor);
    assert!(matches!(result, Err(StoreError::Corrupt(_))));
}

#[test]
fn test_string_invalid_utf8() {
    let mut buf = Vec::new();
    codec::write_u64(&mut buf, 2).unwrap();
    buf.extend_from_slice(&[0xff, 0xfe]);

    let mut cursor = Cursor::new(buf);
    let result = codec::read_string(&mut cursor);
    assert!(matches!(result, Err(StoreError::Corrupt(_))));
}

#[test]
fn test_string_truncated_payload() {
    let mut buf = Vec::new();
    codec::write_u64(&mut buf, 100).unwrap();
    buf.extend_from_slice(b"short");

    let mut cursor = Cursor::new(buf);
    let result = codec::read_string(&mut cursor);
    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[test]
fn test_string_list_round_trip() {
    let items = vec!["one".to_string(), "".to_string(), "three".to_string()];
    let mut buf = Vec::new();
    codec::write_string_list(&mut buf, &items).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(codec::read_string_list(&mut cursor).unwrap(), items);
}

#[test]
fn test_string_list_count_sanity_bound() {
    let mut buf = Vec::new();
    codec::write_u64(&mut buf, codec::MAX_LIST_LEN + 1).unwrap();

    let mut cursor = Cursor::new(buf);
    let result = codec::read_string_list(&mut cursor);
    assert!(matches!(result, Err(StoreError::Corrupt(_))));
}

#[test]
fn test_bool_round_trip_and_rejection() {
    let mut buf = Vec::new();
    codec::write_bool(&mut buf, true).unwrap();
    codec::write_bool(&mut buf, false).unwrap();

    let mut cursor = Cursor::new(buf);
    assert!(codec::read_bool(&mut cursor).unwrap());
    assert!(!codec::read_bool(&mut cursor).unwrap());

    let mut cursor = Cursor::new(vec![0x07]);
    assert!(matches!(
        codec::read_bool(&mut cursor),
        Err(StoreError::Corrupt(_))
    ));
}

#[test]
fn test_scalar_round_trips() {
    let mut buf = Vec::new();
    codec::write_u64(&mut buf, u64::MAX).unwrap();
    codec::write_i64(&mut buf, -1_700_000_000).unwrap();
    codec::write_i32(&mut buf, -42).unwrap();
    codec::write_f32(&mut buf, 8.25).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(codec::read_u64(&mut cursor).unwrap(), u64::MAX);
    assert_eq!(codec::read_i64(&mut cursor).unwrap(), -1_700_000_000);
    assert_eq!(codec::read_i32(&mut cursor).unwrap(), -42);
    assert_eq!(codec::read_f32(&mut cursor).unwrap(), 8.25);
}

// =============================================================================
// Enum Discriminants
// =============================================================================

#[test]
fn test_enum_discriminants() {
    assert_eq!(ExerciseType::from_i32(1).unwrap(), ExerciseType::Cardio);
    assert_eq!(Difficulty::from_i32(3).unwrap(), Difficulty::Expert);

    assert!(matches!(
        ExerciseType::from_i32(99),
        Err(StoreError::Corrupt(_))
    ));
    assert!(matches!(
        Difficulty::from_i32(-1),
        Err(StoreError::Corrupt(_))
    ));
}

// =============================================================================
// Entity Records
// =============================================================================

#[test]
fn test_exercise_record_round_trip() {
    let mut exercise = Exercise::new("EX010", "Plank");
    exercise.kind = ExerciseType::Core;
    exercise.difficulty = Difficulty::Intermediate;
    exercise.description = "Hold a straight line".to_string();
    exercise.target_muscles = vec!["abs".to_string(), "back".to_string()];
    exercise.calories_per_minute = 5;
    exercise.prerequisites = vec!["EX001".to_string()];
    exercise.next_exercises = vec!["EX011".to_string(), "EX012".to_string()];

    let mut buf = Vec::new();
    exercise.encode(&mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(Exercise::decode(&mut cursor).unwrap(), exercise);
}

#[test]
fn test_user_record_round_trip() {
    let mut user = User::new("USER_1_1", "carol", "carol@example.com", "12345");
    user.fitness_level = 4;
    user.experience_points = 900;
    user.completed_exercises = vec!["EX001".to_string()];
    user.achievements = vec!["early-bird".to_string()];

    let mut buf = Vec::new();
    user.encode(&mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(User::decode(&mut cursor).unwrap(), user);
}

#[test]
fn test_quest_record_round_trip() {
    let mut quest = Quest::new("Q042", "Marathon Month");
    quest.description = "Run every day".to_string();
    quest.priority = 7;
    quest.difficulty = 3;
    quest.required_exercises = vec!["EX005".to_string()];
    quest.rewards = vec!["500 XP".to_string(), "badge".to_string()];
    quest.deadline = 1_900_000_000;
    quest.completed = true;

    let mut buf = Vec::new();
    quest.encode(&mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(Quest::decode(&mut cursor).unwrap(), quest);
}

#[test]
fn test_workout_record_round_trip() {
    let mut session = WorkoutSession::start("USER_1_1");
    session.exercises = vec!["EX001".to_string(), "EX002".to_string()];
    session.total_calories = 240;
    session.validated = true;
    session.form_score = 0.875;

    let mut buf = Vec::new();
    session.encode(&mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(WorkoutSession::decode(&mut cursor).unwrap(), session);
}

#[test]
fn test_index_record_round_trips() {
    let entry = EmailEntry {
        email: "dave@example.com".to_string(),
        user_id: "USER_2_2".to_string(),
    };
    let edge = GraphEdge {
        from: "EX001".to_string(),
        to: "EX002".to_string(),
        weight: 1,
    };
    let queued = QueueEntry {
        quest: Quest::new("Q001", "Daily Challenge"),
        priority: 1,
        enqueued_at: 1_800_000_000,
    };

    let mut buf = Vec::new();
    entry.encode(&mut buf).unwrap();
    edge.encode(&mut buf).unwrap();
    queued.encode(&mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(EmailEntry::decode(&mut cursor).unwrap(), entry);
    assert_eq!(GraphEdge::decode(&mut cursor).unwrap(), edge);
    assert_eq!(QueueEntry::decode(&mut cursor).unwrap(), queued);
}

#[test]
fn test_record_decode_stops_at_corrupt_field() {
    // Valid id and name, then a poisoned list count
    let mut buf = Vec::new();
    codec::write_string(&mut buf, "EX001").unwrap();
    codec::write_string(&mut buf, "Push-up").unwrap();
    codec::write_i32(&mut buf, 0).unwrap();
    codec::write_i32(&mut buf, 0).unwrap();
    codec::write_string(&mut buf, "desc").unwrap();
    codec::write_u64(&mut buf, codec::MAX_LIST_LEN + 5).unwrap();

    let mut cursor = Cursor::new(buf);
    assert!(matches!(
        Exercise::decode(&mut cursor),
        Err(StoreError::Corrupt(_))
    ));
}
