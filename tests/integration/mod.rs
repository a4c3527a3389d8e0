//! Integration Tests
//!
//! End-to-end coverage of the intake pipeline over a scripted inference
//! provider: message turns across modalities, failure degradation, and the
//! aggregation-to-synthesis flow. No network calls are made.

// Shared scripted provider and fixtures
mod support;

// Message turn processing across modalities
mod pipeline_test;

// Aggregation and downstream synthesis
mod aggregation_test;
