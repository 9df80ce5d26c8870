// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark encodings: constants or closures over scene inputs.

extern crate alloc;

use alloc::sync::Arc;
use core::any::Any;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::signal::Signal;
use crate::{ColId, InputRef, MarkId, SignalId, Table, TableId};

/// A shared compute closure.
pub type ComputeFn<T> = Arc<dyn Fn(&EvalCtx<'_>, MarkId) -> T>;

/// A single mark property.
pub enum Encoding<T> {
    /// A constant value.
    Const(T),
    /// A value derived from scene inputs.
    ///
    /// `inputs` must list everything `f` reads; [`crate::Scene::update`] uses it to decide
    /// which marks to re-evaluate.
    Compute {
        /// Inputs read by `f`.
        inputs: SmallVec<[InputRef; 2]>,
        /// The compute closure.
        f: ComputeFn<T>,
    },
}

impl<T> Encoding<T> {
    /// Creates a computed encoding.
    pub fn compute<I, F>(inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> T + 'static,
    {
        Self::Compute {
            inputs: inputs.into_iter().collect(),
            f: Arc::new(f),
        }
    }

    /// Inputs read by this encoding (empty for constants).
    pub fn inputs(&self) -> &[InputRef] {
        match self {
            Self::Const(_) => &[],
            Self::Compute { inputs, .. } => inputs,
        }
    }

    /// Returns the constant value, if this is a constant.
    pub fn as_const(&self) -> Option<&T> {
        match self {
            Self::Const(v) => Some(v),
            Self::Compute { .. } => None,
        }
    }
}

impl<T: Clone> Encoding<T> {
    /// Evaluates the encoding for mark `id`.
    pub fn eval(&self, ctx: &EvalCtx<'_>, id: MarkId) -> T {
        match self {
            Self::Const(v) => v.clone(),
            Self::Compute { f, .. } => f(ctx, id),
        }
    }
}

impl<T: Clone> Clone for Encoding<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Const(v) => Self::Const(v.clone()),
            Self::Compute { inputs, f } => Self::Compute {
                inputs: inputs.clone(),
                f: f.clone(),
            },
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Encoding<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Const(v) => f.debug_tuple("Const").field(v).finish(),
            Self::Compute { inputs, .. } => f
                .debug_struct("Compute")
                .field("inputs", inputs)
                .finish_non_exhaustive(),
        }
    }
}

impl<T> From<T> for Encoding<T> {
    fn from(value: T) -> Self {
        Self::Const(value)
    }
}

/// Read-only view of scene inputs handed to compute closures.
#[derive(Debug, Clone, Copy)]
pub struct EvalCtx<'a> {
    tables: &'a HashMap<TableId, Table>,
    signals: &'a HashMap<SignalId, Signal>,
}

impl<'a> EvalCtx<'a> {
    pub(crate) fn new(
        tables: &'a HashMap<TableId, Table>,
        signals: &'a HashMap<SignalId, Signal>,
    ) -> Self {
        Self { tables, signals }
    }

    /// Returns a numeric table cell.
    pub fn table_f64(&self, table: TableId, row: usize, col: ColId) -> Option<f64> {
        self.tables.get(&table)?.f64(row, col)
    }

    /// Returns the number of rows (row keys) of a table, `0` if missing.
    pub fn table_row_count(&self, table: TableId) -> usize {
        self.tables.get(&table).map_or(0, |t| t.row_keys.len())
    }

    /// Returns a reference to a signal value of type `T`.
    pub fn signal_ref<T: Any>(&self, signal: SignalId) -> Option<&'a T> {
        self.signals.get(&signal)?.value.downcast_ref::<T>()
    }

    /// Returns a clone of a signal value of type `T`.
    pub fn signal<T: Any + Clone>(&self, signal: SignalId) -> Option<T> {
        self.signal_ref::<T>(signal).cloned()
    }
}
