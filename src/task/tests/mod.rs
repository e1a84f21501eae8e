//! Unit tests for the task module.
//!
//! Domain rules are tested directly; board behaviour is tested against the
//! in-memory store and against mocked stores for failure paths.

mod support;
