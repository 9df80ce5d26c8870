// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::boxed::Box;

use crate::{MarkId, MarkKind, MarkPayload};

/// A change to the retained mark set, produced by [`crate::Scene::tick`] and
/// [`crate::Scene::update`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A new mark.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// Evaluated payload.
        new: Box<MarkPayload>,
    },
    /// An existing mark whose payload or paint order changed.
    Update {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
    },
    /// A removed mark.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Last payload.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// The affected mark.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}
