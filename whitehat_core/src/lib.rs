// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained mark scene for the Whitehat views.
//!
//! A [`Scene`] owns:
//! - **tables**: numeric row data behind a [`TableData`] accessor, with stable row keys,
//! - **signals**: typed scalar inputs (a zoom transform, a brushed state name, ...),
//! - **marks**: stable-identity visual primitives ([`Mark`]) whose encodings are either
//!   constants or small closures over tables and signals.
//!
//! Views rebuild their full mark list with [`Scene::tick`] and get back a list of
//! [`MarkDiff`]s (enter/update/exit). Cheap changes such as a highlight or an animated
//! transform are expressed by setting a signal and calling [`Scene::update`], which only
//! re-evaluates marks that read the changed inputs.
//!
//! Rendering backends are out of scope: consumers apply the diffs to their own retained
//! representation (SVG, a display list, ...).

#![no_std]

extern crate alloc;

mod diff;
mod encoding;
mod ids;
mod mark;
mod payload;
mod scene;
mod signal;
mod table;

pub use diff::MarkDiff;
pub use encoding::{ComputeFn, Encoding, EvalCtx};
pub use ids::{ColId, InputRef, MarkId, SignalId, TableId};
pub use mark::{
    Mark, MarkBuilder, MarkEncodings, MarkKind, PaintEncodings, PathEncodings, RectEncodings,
    TextAnchor, TextBaseline, TextEncodings,
};
pub use payload::{MarkPayload, Paint, PathPayload, RectPayload, TextPayload};
pub use scene::Scene;
pub use signal::SignalError;
pub use table::{Table, TableData};
