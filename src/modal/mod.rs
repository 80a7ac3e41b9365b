//! Modal presentation: the controller seam the toolbar talks to and the
//! in-app stack that backs it.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Error, Result};

/// Content a modal can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalComponent {
    UserMenu,
}

/// Style class of the user-menu modal.
pub const USER_MENU_CLASS: &str = "user-menu-modal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    pub component: ModalComponent,
    /// Selects the modal's frame layout; unknown classes get the default one.
    pub style_class: String,
    /// Programmatic dismissal is allowed.
    pub can_dismiss: bool,
    pub show_backdrop: bool,
    /// Tapping the backdrop dismisses the modal.
    pub backdrop_dismiss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl ModalId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ModalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "modal#{}", self.0)
    }
}

pub trait ModalController {
    type Handle: ModalHandle + Send + Sync + 'static;

    fn create(&self, options: ModalOptions)
        -> impl Future<Output = Result<Self::Handle>> + Send;
}

pub trait ModalHandle {
    fn id(&self) -> ModalId;

    fn present(&self) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalEntry {
    pub id: ModalId,
    pub options: ModalOptions,
    pub presented: bool,
}

#[derive(Debug, Default)]
struct StackState {
    next_id: u64,
    entries: Vec<ModalEntry>,
    closed: bool,
}

/// Modals created by the app, in stacking order (last is topmost).
#[derive(Clone, Default)]
pub struct ModalStack {
    state: Arc<Mutex<StackState>>,
    repaint: Option<egui::Context>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a repaint of `ctx` whenever the stack changes off the UI thread.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, StackState>> {
        self.state
            .lock()
            .map_err(|_| Error::Modal("Modal stack lock poisoned".to_string()))
    }

    fn request_repaint(&self) {
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }

    /// Presented modals, bottom first.
    pub fn presented(&self) -> Vec<ModalEntry> {
        self.lock()
            .map(|state| state.entries.iter().filter(|e| e.presented).cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.lock()
            .map(|state| state.entries.iter().any(|e| e.id == id))
            .unwrap_or(false)
    }

    /// Programmatic dismissal. Returns `false` if the modal is unknown or
    /// does not allow it.
    pub fn dismiss(&self, id: ModalId) -> bool {
        self.remove_where(id, |options| options.can_dismiss)
    }

    /// Dismissal caused by a tap on the backdrop behind `id`.
    pub fn backdrop_tapped(&self, id: ModalId) -> bool {
        self.remove_where(id, |options| options.can_dismiss && options.backdrop_dismiss)
    }

    fn remove_where(&self, id: ModalId, allowed: impl Fn(&ModalOptions) -> bool) -> bool {
        let Ok(mut state) = self.lock() else {
            return false;
        };
        let Some(index) = state.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        if !allowed(&state.entries[index].options) {
            return false;
        }

        state.entries.remove(index);
        log::debug!("Dismissed {}", id);
        true
    }

    /// Drops every modal and rejects later `create` calls.
    pub fn close(&self) {
        if let Ok(mut state) = self.lock() {
            state.closed = true;
            state.entries.clear();
        }
    }
}

impl ModalController for ModalStack {
    type Handle = StackedModal;

    async fn create(&self, options: ModalOptions) -> Result<StackedModal> {
        tokio::task::yield_now().await;

        let id = {
            let mut state = self.lock()?;
            if state.closed {
                return Err(Error::Modal("Modal stack is closed".to_string()));
            }
            state.next_id += 1;
            let id = ModalId(state.next_id);
            state.entries.push(ModalEntry {
                id,
                options,
                presented: false,
            });
            id
        };

        log::debug!("Created {}", id);
        Ok(StackedModal {
            id,
            stack: self.clone(),
        })
    }
}

pub struct StackedModal {
    id: ModalId,
    stack: ModalStack,
}

impl ModalHandle for StackedModal {
    fn id(&self) -> ModalId {
        self.id
    }

    async fn present(&self) -> Result<()> {
        tokio::task::yield_now().await;

        {
            let mut state = self.stack.lock()?;
            let entry = state
                .entries
                .iter_mut()
                .find(|e| e.id == self.id)
                .ok_or_else(|| Error::Modal(format!("{} is gone and cannot be presented", self.id)))?;
            entry.presented = true;
        }

        log::debug!("Presented {}", self.id);
        self.stack.request_repaint();
        Ok(())
    }
}
