//! I/O utilities for buffer handling
//!
//! This module provides traits and implementations for reading binary
//! data in either byte order.

pub mod seekable;
pub mod byte_order;
