//! Test Module
//!
//! Pipeline and service tests against a scripted completion collaborator.
//!
//! ## Test Categories
//! - `chat_pipeline_tests`: chat reply normalization, suggestions, fallback
//! - `exam_pipeline_tests`: exam guide prompt, fence handling, error surfacing
//! - `session_tests`: per-message flow over the in-memory store

pub mod session_tests;
