//! Per-page view state.
//!
//! Every page cycles through the same phases: `Loading` while a fetch is in
//! flight, then `Ready` with a payload or `Failed` with a message. A
//! successful mutation patches the `Ready` payload in place and raises a
//! transient success [`Notice`]; a failed mutation moves to `Failed` but
//! retains the previous payload so the page is not blanked.
//!
//! Loads are guarded by a generation counter. [`PageView::begin_load`] hands
//! out a [`LoadTicket`] tied to the current generation and every later call
//! invalidates earlier tickets, so a result arriving after the page moved on
//! is discarded instead of clobbering fresher state. Overlapping loads are
//! legal; the newest one wins.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generation counter distinguishing load attempts on one page instance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LoadSeq(u64);

/// Proof of a started load, consumed when reporting its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(LoadSeq);

/// Transient notice shown after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Localised message shown to the user.
    pub message: String,
}

impl Notice {
    /// Build a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rendering phase of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum ViewState<T> {
    /// A load is in flight and no payload is shown.
    Loading,
    /// The last load succeeded.
    Ready {
        /// Payload produced by the load.
        payload: T,
    },
    /// The last load or mutation failed.
    Failed {
        /// Localised message shown in the error banner.
        message: String,
        /// Payload retained from before a failed mutation, absent when the
        /// failure came from a load.
        #[serde(skip_serializing_if = "Option::is_none")]
        retained: Option<T>,
    },
}

/// View state plus the transient notice and load-generation bookkeeping for
/// one page instance.
///
/// # Examples
/// ```
/// use harvestworld::domain::{PageView, ViewState};
///
/// let mut view: PageView<Vec<String>> = PageView::new();
/// let ticket = view.begin_load();
/// assert!(view.finish_load(ticket, Ok(vec!["Bayam".to_owned()])));
/// assert!(matches!(view.state(), ViewState::Ready { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageView<T> {
    state: ViewState<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
    #[serde(skip)]
    seq: LoadSeq,
}

impl<T> Default for PageView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageView<T> {
    /// Fresh page instance. Loading is always the initial phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ViewState::Loading,
            notice: None,
            seq: LoadSeq(0),
        }
    }

    /// View already settled in `Ready`, for pages whose load completes
    /// within one request.
    #[must_use]
    pub fn ready(payload: T) -> Self {
        let mut view = Self::new();
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(payload));
        view
    }

    /// View settled in `Failed` after a rejected submission, retaining the
    /// payload under the error banner.
    #[must_use]
    pub fn rejected(payload: T, message: impl Into<String>) -> Self {
        let mut view = Self::ready(payload);
        view.apply_mutation_failure(message);
        view
    }

    /// View settled in `Failed` with nothing retained, as after a failed
    /// load.
    #[must_use]
    pub fn load_failed(message: impl Into<String>) -> Self {
        let mut view = Self::new();
        let ticket = view.begin_load();
        view.finish_load(ticket, Err(message.into()));
        view
    }

    /// Current rendering phase.
    pub const fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Current transient notice, if any.
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Payload of the current `Ready` phase, if any.
    pub const fn payload(&self) -> Option<&T> {
        match &self.state {
            ViewState::Ready { payload } => Some(payload),
            ViewState::Loading | ViewState::Failed { .. } => None,
        }
    }

    /// Start a new load cycle.
    ///
    /// Moves the phase to `Loading`, clears any notice, and invalidates
    /// tickets from earlier cycles.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.seq = LoadSeq(self.seq.0.wrapping_add(1));
        self.state = ViewState::Loading;
        self.notice = None;
        LoadTicket(self.seq)
    }

    /// Apply the outcome of a load, returning whether it was applied.
    ///
    /// A ticket from a superseded cycle is discarded without touching the
    /// state; the caller learns this from the `false` return.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: Result<T, String>) -> bool {
        if ticket.0 != self.seq {
            return false;
        }
        self.state = match outcome {
            Ok(payload) => ViewState::Ready { payload },
            Err(message) => ViewState::Failed {
                message,
                retained: None,
            },
        };
        true
    }

    /// Patch the `Ready` payload in place after a successful mutation and
    /// raise the success notice. Returns whether the patch was applied.
    ///
    /// No re-fetch happens; the caller is responsible for making the patch
    /// mirror what the gateway persisted.
    pub fn apply_mutation_success(
        &mut self,
        message: impl Into<String>,
        patch: impl FnOnce(&mut T),
    ) -> bool {
        let ViewState::Ready { payload } = &mut self.state else {
            return false;
        };
        patch(payload);
        self.notice = Some(Notice::success(message));
        true
    }

    /// Record a failed mutation.
    ///
    /// The previous `Ready` payload is retained so the page keeps rendering
    /// it under the error banner.
    pub fn apply_mutation_failure(&mut self, message: impl Into<String>) {
        self.notice = None;
        let retained = match std::mem::replace(&mut self.state, ViewState::Loading) {
            ViewState::Ready { payload } => Some(payload),
            ViewState::Failed { retained, .. } => retained,
            ViewState::Loading => None,
        };
        self.state = ViewState::Failed {
            message: message.into(),
            retained,
        };
    }

    /// Drop the transient notice, reverting a Success rendition to plain
    /// `Ready`.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
