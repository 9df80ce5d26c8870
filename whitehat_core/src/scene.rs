// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained scene.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use hashbrown::{HashMap, HashSet};

use crate::signal::Signal;
use crate::{
    EvalCtx, InputRef, Mark, MarkDiff, MarkId, MarkPayload, SignalError, SignalId, Table,
    TableData, TableId,
};

#[derive(Debug)]
struct MarkState {
    mark: Mark,
    payload: MarkPayload,
}

/// Retained tables, signals and marks.
#[derive(Debug, Default)]
pub struct Scene {
    tables: HashMap<TableId, Table>,
    signals: HashMap<SignalId, Signal>,
    marks: HashMap<MarkId, MarkState>,
    dirty_tables: HashSet<TableId>,
    dirty_signals: HashSet<SignalId>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a table.
    pub fn insert_table(&mut self, table: Table) {
        let id = table.id;
        self.tables.insert(id, table);
        self.dirty_tables.insert(id);
    }

    /// Returns a table.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Replaces a table's row keys and data, creating the table if needed.
    pub fn set_table(&mut self, id: TableId, row_keys: Vec<u64>, data: Box<dyn TableData>) {
        let table = self.tables.entry(id).or_insert_with(|| Table::new(id));
        table.row_keys = row_keys;
        table.data = Some(data);
        table.bump();
        self.dirty_tables.insert(id);
    }

    /// Inserts a signal, replacing any previous value regardless of type.
    pub fn insert_signal<T: Any>(&mut self, id: SignalId, value: T) {
        let version = self.signals.get(&id).map_or(0, |s| s.version.wrapping_add(1));
        self.signals.insert(
            id,
            Signal {
                value: Box::new(value),
                version,
            },
        );
        self.dirty_signals.insert(id);
    }

    /// Sets an existing signal.
    ///
    /// Fails if the signal was never inserted or holds a value of another type.
    pub fn set_signal<T: Any>(&mut self, id: SignalId, value: T) -> Result<(), SignalError> {
        let signal = self.signals.get_mut(&id).ok_or(SignalError::Missing(id))?;
        let slot = signal
            .value
            .downcast_mut::<T>()
            .ok_or(SignalError::TypeMismatch(id))?;
        *slot = value;
        signal.version = signal.version.wrapping_add(1);
        self.dirty_signals.insert(id);
        Ok(())
    }

    /// Returns a clone of a signal value.
    pub fn signal<T: Any + Clone>(&self, id: SignalId) -> Option<T> {
        self.signals.get(&id)?.value.downcast_ref::<T>().cloned()
    }

    /// Replaces the retained mark set with `marks`.
    ///
    /// Every mark is evaluated. Enter and update diffs follow the input order; exit diffs
    /// follow, sorted by id. Marks whose payload and paint order are unchanged produce no diff.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        let ctx = EvalCtx::new(&self.tables, &self.signals);
        let mut next: HashMap<MarkId, MarkState> = HashMap::new();
        let mut diffs = Vec::new();

        for mark in marks {
            let payload = mark.evaluate(&ctx);
            let previous = next.remove(&mark.id).or_else(|| self.marks.remove(&mark.id));
            match previous {
                Some(old) => {
                    if old.payload != payload || old.mark.z_index != mark.z_index {
                        diffs.push(MarkDiff::Update {
                            id: mark.id,
                            kind: mark.kind,
                            z_index: mark.z_index,
                            old: Box::new(old.payload),
                            new: Box::new(payload.clone()),
                        });
                    }
                }
                None => diffs.push(MarkDiff::Enter {
                    id: mark.id,
                    kind: mark.kind,
                    z_index: mark.z_index,
                    new: Box::new(payload.clone()),
                }),
            }
            next.insert(mark.id, MarkState { mark, payload });
        }

        let mut exits: Vec<(MarkId, MarkState)> = self.marks.drain().collect();
        exits.sort_by_key(|(id, _)| *id);
        diffs.extend(exits.into_iter().map(|(id, state)| MarkDiff::Exit {
            id,
            kind: state.mark.kind,
            old: Box::new(state.payload),
        }));

        self.marks = next;
        self.dirty_tables.clear();
        self.dirty_signals.clear();
        diffs
    }

    /// Re-evaluates marks that read a table or signal changed since the last tick or update.
    ///
    /// Diffs are sorted by mark id.
    pub fn update(&mut self) -> Vec<MarkDiff> {
        if self.dirty_tables.is_empty() && self.dirty_signals.is_empty() {
            return Vec::new();
        }
        let mut ids: Vec<MarkId> = self
            .marks
            .iter()
            .filter(|(_, state)| {
                state.mark.inputs().iter().any(|input| match input {
                    InputRef::Signal { signal } => self.dirty_signals.contains(signal),
                    InputRef::TableCol { table, .. } => self.dirty_tables.contains(table),
                })
            })
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();

        let ctx = EvalCtx::new(&self.tables, &self.signals);
        let mut diffs = Vec::new();
        for id in ids {
            let Some(state) = self.marks.get_mut(&id) else {
                continue;
            };
            let payload = state.mark.evaluate(&ctx);
            if payload != state.payload {
                let old = core::mem::replace(&mut state.payload, payload.clone());
                diffs.push(MarkDiff::Update {
                    id,
                    kind: state.mark.kind,
                    z_index: state.mark.z_index,
                    old: Box::new(old),
                    new: Box::new(payload),
                });
            }
        }
        self.dirty_tables.clear();
        self.dirty_signals.clear();
        diffs
    }

    /// Number of retained marks.
    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    /// The current payload of a mark.
    pub fn payload(&self, id: MarkId) -> Option<&MarkPayload> {
        self.marks.get(&id).map(|s| &s.payload)
    }

    /// The paint order of a mark.
    pub fn z_index(&self, id: MarkId) -> Option<i32> {
        self.marks.get(&id).map(|s| s.mark.z_index)
    }

    /// All payloads in paint order (`z_index`, then id).
    pub fn payloads_in_paint_order(&self) -> Vec<(MarkId, &MarkPayload)> {
        let mut out: Vec<(i32, MarkId, &MarkPayload)> = self
            .marks
            .iter()
            .map(|(id, s)| (s.mark.z_index, *id, &s.payload))
            .collect();
        out.sort_by_key(|(z, id, _)| (*z, *id));
        out.into_iter().map(|(_, id, p)| (id, p)).collect()
    }
}
