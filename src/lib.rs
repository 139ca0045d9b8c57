//! Workspace-level integration tests for PiCalc-rs. See `tests/`.
