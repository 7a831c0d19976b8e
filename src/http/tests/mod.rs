//! Unit tests for the REST adapter.
