//! Tests for the maker module

mod scanner_tests;
