// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers for tables, columns, signals and marks.

/// Identifies a table within a [`crate::Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

/// Identifies a numeric column within a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColId(pub u32);

/// Identifies a typed signal within a [`crate::Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub u32);

/// Stable mark identity.
///
/// Marks keep their id across ticks, which is what lets the scene report
/// enter/update/exit transitions instead of a full redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

/// Row-derived ids always carry this bit; hand-assigned ids should stay below it.
const ROW_BIT: u64 = 1 << 63;

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives an id from a table and a stable row key.
    pub fn for_row(table: TableId, row_key: u64) -> Self {
        Self::for_series_row(table, 0, row_key)
    }

    /// Derives an id from a table, a series index and a stable row key.
    ///
    /// Use distinct series when several mark sets are generated from the same table rows
    /// (for example one bar per row and gender).
    pub fn for_series_row(table: TableId, series: u32, row_key: u64) -> Self {
        let head = (u64::from(table.0) << 32) | u64::from(series);
        let mixed = splitmix64(splitmix64(head) ^ splitmix64(row_key));
        Self(mixed | ROW_BIT)
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// An input that a computed encoding reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputRef {
    /// A scene signal.
    Signal {
        /// The signal id.
        signal: SignalId,
    },
    /// A column of a scene table.
    TableCol {
        /// The table id.
        table: TableId,
        /// The column id.
        col: ColId,
    },
}
