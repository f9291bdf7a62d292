//! Cross-crate integration tests for the apportionment workspace live in
//! `tests/`.
