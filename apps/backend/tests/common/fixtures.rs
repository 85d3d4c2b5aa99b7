//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a unique username to avoid collisions between test runs.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a register request body.
pub fn register_request(username: &str) -> serde_json::Value {
    json!({ "username": username })
}

/// Create a dictionary request body.
pub fn create_dictionary_request(name: &str) -> serde_json::Value {
    json!({ "name": name, "description": "test dictionary" })
}

/// Create a word request body.
pub fn create_word_request(dictionary_id: i64, term: &str, translation: &str) -> serde_json::Value {
    json!({
        "dictionary_id": dictionary_id,
        "term": term,
        "translation": translation,
    })
}

/// Create a word request body with an explicit difficulty.
pub fn create_word_request_with_difficulty(
    dictionary_id: i64,
    term: &str,
    translation: &str,
    difficulty: u8,
) -> serde_json::Value {
    json!({
        "dictionary_id": dictionary_id,
        "term": term,
        "translation": translation,
        "difficulty": difficulty,
    })
}

/// Create a start-training request body.
pub fn start_training_request(dictionary_id: i64, direction: &str) -> serde_json::Value {
    json!({
        "dictionary_id": dictionary_id,
        "mode": "quiz",
        "direction": direction,
    })
}

/// Create a record-answer request body.
pub fn record_answer_request(word_id: i64, correct: bool) -> serde_json::Value {
    json!({
        "word_id": word_id,
        "correct": correct,
        "user_answer": "typed answer",
    })
}
