//! Server-held page sessions for the admin member directory.
//!
//! The member directory is the one page with state that outlives a single
//! request: a loaded list that mutations patch in place, a transient success
//! notice that reverts after [`NOTICE_TTL`], and loads whose results may
//! arrive after the page has moved on. Each open page runs as a task owning
//! a [`PageView`], driven by commands from a bounded channel.
//!
//! Loads are spawned as separate tasks that report back through the same
//! command channel, so a result arriving after a newer load began (or after
//! the page closed) is discarded by the ticket guard instead of clobbering
//! state. Closing a page drops the channel, which cancels the pending revert
//! timer with it.
//!
//! Pages the visitor abandoned without closing are reaped after
//! `IDLE_TIMEOUT` without commands.

use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::directory::{DirectoryLoad, apply_role_change, load_directory};
use crate::domain::identity::{AssignableRole, Identity, IdentityId};
use crate::domain::messages;
use crate::domain::ports::ProfileDirectory;
use crate::domain::view::{LoadTicket, PageView};

/// How long a success notice stays up before reverting to plain `Ready`.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Commands a page accepts before being reaped.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

const COMMAND_BUFFER: usize = 16;

/// View state of the member directory page.
pub type DirectoryView = PageView<Vec<Identity>>;

/// Identifier of an open page session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier received from a client.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The page session has closed or been reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page session is closed")]
pub struct PageClosed;

enum PageCommand {
    Snapshot {
        reply: oneshot::Sender<DirectoryView>,
    },
    Reload {
        reply: oneshot::Sender<DirectoryView>,
    },
    ChangeRole {
        target: IdentityId,
        role: AssignableRole,
        reply: oneshot::Sender<DirectoryView>,
    },
    LoadFinished {
        ticket: LoadTicket,
        outcome: Result<Vec<Identity>, String>,
    },
    Close,
}

/// Client half of a page session.
#[derive(Clone)]
pub struct PageHandle {
    id: PageId,
    commands: mpsc::Sender<PageCommand>,
}

impl PageHandle {
    /// Identifier of the page session.
    #[must_use]
    pub const fn id(&self) -> PageId {
        self.id
    }

    /// Current view without side effects.
    pub async fn snapshot(&self) -> Result<DirectoryView, PageClosed> {
        self.request(|reply| PageCommand::Snapshot { reply }).await
    }

    /// Start a fresh load and wait for its outcome.
    ///
    /// If a newer load supersedes this one while it is in flight, the reply
    /// carries whatever view is current once this load's result lands.
    pub async fn reload(&self) -> Result<DirectoryView, PageClosed> {
        self.request(|reply| PageCommand::Reload { reply }).await
    }

    /// Change a member's role and return the view after the mutation.
    pub async fn change_role(
        &self,
        target: IdentityId,
        role: AssignableRole,
    ) -> Result<DirectoryView, PageClosed> {
        self.request(|reply| PageCommand::ChangeRole {
            target,
            role,
            reply,
        })
        .await
    }

    /// Close the page session, cancelling any pending notice revert.
    pub async fn close(&self) {
        if self.commands.send(PageCommand::Close).await.is_err() {
            tracing::trace!(page = %self.id, "page already closed");
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<DirectoryView>) -> PageCommand,
    ) -> Result<DirectoryView, PageClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| PageClosed)?;
        response.await.map_err(|_| PageClosed)
    }
}

type PageMap = Arc<RwLock<HashMap<PageId, PageHandle>>>;

/// Registry of open page sessions, shared with the HTTP layer.
pub struct PageRegistry {
    directory: Arc<dyn ProfileDirectory>,
    pages: PageMap,
}

impl PageRegistry {
    /// Create an empty registry over the given profile directory.
    #[must_use]
    pub fn new(directory: Arc<dyn ProfileDirectory>) -> Self {
        Self {
            directory,
            pages: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a member directory page and wait for its initial load.
    pub async fn open_directory_page(&self) -> Result<(PageHandle, DirectoryView), PageClosed> {
        let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
        let id = PageId::generate();
        let handle = PageHandle {
            id,
            commands: commands.clone(),
        };

        let actor = PageActor {
            id,
            directory: Arc::clone(&self.directory),
            inbox,
            loopback: commands,
            registry: Arc::downgrade(&self.pages),
            view: PageView::new(),
            waiters: Vec::new(),
        };
        tokio::spawn(actor.run());

        {
            let mut pages = self.pages.write().unwrap_or_else(|err| err.into_inner());
            pages.insert(id, handle.clone());
        }

        let view = handle.reload().await?;
        Ok((handle, view))
    }

    /// Look up an open page session.
    #[must_use]
    pub fn get(&self, id: PageId) -> Option<PageHandle> {
        let pages = self.pages.read().unwrap_or_else(|err| err.into_inner());
        pages.get(&id).cloned()
    }

    /// Close a page session, returning whether it was open.
    pub async fn close(&self, id: PageId) -> bool {
        let handle = {
            let mut pages = self.pages.write().unwrap_or_else(|err| err.into_inner());
            pages.remove(&id)
        };
        match handle {
            Some(handle) => {
                handle.close().await;
                true
            }
            None => false,
        }
    }
}

struct PageActor {
    id: PageId,
    directory: Arc<dyn ProfileDirectory>,
    inbox: mpsc::Receiver<PageCommand>,
    loopback: mpsc::Sender<PageCommand>,
    registry: Weak<RwLock<HashMap<PageId, PageHandle>>>,
    view: DirectoryView,
    waiters: Vec<(LoadTicket, oneshot::Sender<DirectoryView>)>,
}

impl PageActor {
    async fn run(mut self) {
        let mut revert = Box::pin(time::sleep(NOTICE_TTL));
        let mut revert_armed = false;
        let mut idle = Box::pin(time::sleep(IDLE_TIMEOUT));

        loop {
            tokio::select! {
                // Biased so an expired revert timer fires before queued
                // commands observe the stale notice.
                biased;

                () = revert.as_mut(), if revert_armed => {
                    revert_armed = false;
                    self.view.clear_notice();
                }
                command = self.inbox.recv() => {
                    let Some(command) = command else { break };
                    idle.as_mut().reset(time::Instant::now() + IDLE_TIMEOUT);
                    let armed = self
                        .handle_command(command, |deadline| revert.as_mut().reset(deadline))
                        .await;
                    match armed {
                        ControlFlow::Continue(rearmed) => {
                            if rearmed {
                                revert_armed = true;
                            }
                        }
                        ControlFlow::Break(()) => break,
                    }
                }
                () = idle.as_mut() => {
                    tracing::debug!(page = %self.id, "reaping idle page session");
                    break;
                }
            }
        }

        self.deregister();
    }

    /// Handle one command. Returns whether the revert timer was re-armed,
    /// or `Break` to shut the session down.
    async fn handle_command(
        &mut self,
        command: PageCommand,
        rearm_revert: impl FnOnce(time::Instant),
    ) -> ControlFlow<(), bool> {
        match command {
            PageCommand::Snapshot { reply } => {
                respond(self.id, reply, self.view.clone());
            }
            PageCommand::Reload { reply } => {
                let ticket = self.view.begin_load();
                self.waiters.push((ticket, reply));
                self.spawn_load(ticket);
            }
            PageCommand::LoadFinished { ticket, outcome } => {
                if !self.view.finish_load(ticket, outcome) {
                    tracing::debug!(page = %self.id, "discarding superseded load result");
                }
                self.answer_waiters(ticket);
            }
            PageCommand::ChangeRole {
                target,
                role,
                reply,
            } => {
                let rearmed = self.apply_role_mutation(target, role).await;
                if rearmed {
                    rearm_revert(time::Instant::now() + NOTICE_TTL);
                }
                respond(self.id, reply, self.view.clone());
                return ControlFlow::Continue(rearmed);
            }
            PageCommand::Close => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(false)
    }

    async fn apply_role_mutation(&mut self, target: IdentityId, role: AssignableRole) -> bool {
        match self.directory.assign_role(target, role).await {
            Ok(()) => {
                let message = messages::role_changed(role);
                let applied = self.view.apply_mutation_success(message, |members| {
                    if !apply_role_change(members, target, role) {
                        tracing::warn!(page = %self.id, %target, "mutated member missing from loaded list");
                    }
                });
                if !applied {
                    tracing::debug!(page = %self.id, "role mutation outside the ready phase");
                }
                applied
            }
            Err(error) => {
                tracing::warn!(page = %self.id, %target, %error, "role mutation failed");
                let message = error
                    .gateway_message()
                    .map_or_else(|| messages::GENERIC_FAILURE.to_owned(), str::to_owned);
                self.view.apply_mutation_failure(message);
                false
            }
        }
    }

    fn spawn_load(&self, ticket: LoadTicket) {
        let directory = Arc::clone(&self.directory);
        let loopback = self.loopback.clone();
        let page = self.id;
        tokio::spawn(async move {
            let outcome = match load_directory(directory.as_ref()).await {
                DirectoryLoad::AllSucceeded(members) => Ok(members),
                DirectoryLoad::PartialFailure { error, .. } => Err(error
                    .gateway_message()
                    .map_or_else(|| messages::GENERIC_FAILURE.to_owned(), str::to_owned)),
            };
            let report = PageCommand::LoadFinished { ticket, outcome };
            if loopback.send(report).await.is_err() {
                tracing::debug!(%page, "page closed before load completion");
            }
        });
    }

    fn answer_waiters(&mut self, ticket: LoadTicket) {
        let mut remaining = Vec::with_capacity(self.waiters.len());
        for (waiting, reply) in self.waiters.drain(..) {
            if waiting == ticket {
                respond(self.id, reply, self.view.clone());
            } else {
                remaining.push((waiting, reply));
            }
        }
        self.waiters = remaining;
    }

    fn deregister(&self) {
        if let Some(pages) = self.registry.upgrade() {
            let mut pages = pages.write().unwrap_or_else(|err| err.into_inner());
            pages.remove(&self.id);
        }
    }
}

fn respond(page: PageId, reply: oneshot::Sender<DirectoryView>, view: DirectoryView) {
    if reply.send(view).is_err() {
        tracing::trace!(%page, "page view requester went away before the reply");
    }
}
