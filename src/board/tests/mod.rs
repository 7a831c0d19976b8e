//! Unit tests for the board context.

mod manager_tests;
