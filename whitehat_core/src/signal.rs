// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed scene signals.

extern crate alloc;

use alloc::boxed::Box;
use core::any::Any;

use crate::SignalId;

pub(crate) struct Signal {
    pub(crate) value: Box<dyn Any>,
    pub(crate) version: u64,
}

impl core::fmt::Debug for Signal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Errors returned by [`crate::Scene::set_signal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalError {
    /// No signal with this id was inserted.
    Missing(SignalId),
    /// The signal holds a value of a different type.
    TypeMismatch(SignalId),
}

impl core::fmt::Display for SignalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Missing(id) => write!(f, "signal {} does not exist", id.0),
            Self::TypeMismatch(id) => write!(f, "signal {} holds a different type", id.0),
        }
    }
}

impl core::error::Error for SignalError {}
