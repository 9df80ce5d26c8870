// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Cross-view state owned by the host.
///
/// Views read it and change it only through the setters.
pub trait LinkedViewState {
    /// The normalized name of the brushed state.
    fn brushed_state(&self) -> Option<&str>;
    /// Sets the brushed state.
    fn set_brushed_state(&mut self, state: Option<String>);
    /// The name of the zoomed state.
    fn zoomed_state(&self) -> Option<&str>;
    /// Sets the zoomed state.
    fn set_zoomed_state(&mut self, state: Option<String>);
}

/// Plain [`LinkedViewState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedViewState {
    /// Brushed state.
    pub brushed: Option<String>,
    /// Zoomed state.
    pub zoomed: Option<String>,
}

impl LinkedViewState for SharedViewState {
    fn brushed_state(&self) -> Option<&str> {
        self.brushed.as_deref()
    }

    fn set_brushed_state(&mut self, state: Option<String>) {
        tracing::debug!(?state, "brushed state changed");
        self.brushed = state;
    }

    fn zoomed_state(&self) -> Option<&str> {
        self.zoomed.as_deref()
    }

    fn set_zoomed_state(&mut self, state: Option<String>) {
        tracing::debug!(?state, "zoomed state changed");
        self.zoomed = state;
    }
}
