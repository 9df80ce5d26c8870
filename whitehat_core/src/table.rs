// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tables.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{ColId, TableId};

/// Read access to numeric table data.
///
/// Implementations are usually plain column vectors owned by the view that fills the table.
pub trait TableData: core::fmt::Debug {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Returns the value at `(row, col)`, or `None` if either is out of range.
    fn f64(&self, row: usize, col: ColId) -> Option<f64>;
}

/// A table: stable row keys plus an optional data accessor.
#[derive(Debug)]
pub struct Table {
    /// Table id.
    pub id: TableId,
    /// Stable row identity, one key per row.
    pub row_keys: Vec<u64>,
    /// Row data.
    pub data: Option<Box<dyn TableData>>,
    /// Bumped whenever the content changes.
    pub version: u64,
}

impl Table {
    /// Creates an empty table.
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            row_keys: Vec::new(),
            data: None,
            version: 0,
        }
    }

    /// Marks the table content as changed.
    pub fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Returns the value at `(row, col)` if the table has data.
    pub fn f64(&self, row: usize, col: ColId) -> Option<f64> {
        self.data.as_ref()?.f64(row, col)
    }
}
