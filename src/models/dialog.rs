//! Alert collaborator and the single active-dialog slot of the presentation boundary.

use serde::Serialize;

/// Something that can show a titled message to the session admin.
pub trait Alert {
    fn display(&mut self, title: &str, message: &str);
}

impl<F: FnMut(&str, &str)> Alert for F {
    fn display(&mut self, title: &str, message: &str) {
        self(title, message)
    }
}

/// Callback of a confirm dialog; receives `true` when the admin confirmed.
pub type ConfirmAction = Box<dyn FnOnce(bool) + Send + Sync>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    Alert,
    Confirm,
}

/// What the presentation layer shows while a dialog is open.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DialogView {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

struct ActiveDialog {
    view: DialogView,
    action: Option<ConfirmAction>,
}

/// At most one dialog is open at a time. A second alert is not shown (the first stays
/// up); a second confirm fails immediately.
#[derive(Default)]
pub struct DialogSlot {
    active: Option<ActiveDialog>,
}

impl DialogSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&DialogView> {
        self.active.as_ref().map(|d| &d.view)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Ask a yes/no question. `action` runs when the dialog is dismissed, or right away
    /// with `false` if another dialog is open.
    pub fn confirm(&mut self, title: &str, message: &str, action: ConfirmAction) {
        if self.active.is_some() {
            log::info!("Double confirm, immediately failing for '{}'", message);
            action(false);
            return;
        }
        self.active = Some(ActiveDialog {
            view: DialogView {
                kind: DialogKind::Confirm,
                title: title.to_string(),
                message: message.to_string(),
            },
            action: Some(action),
        });
    }

    /// Close the open dialog. For a confirm, `result` is passed to its action.
    /// Returns false when nothing was open.
    pub fn dismiss(&mut self, result: bool) -> bool {
        match self.active.take() {
            Some(dialog) => {
                if let Some(action) = dialog.action {
                    action(result);
                }
                true
            }
            None => false,
        }
    }
}

impl Alert for DialogSlot {
    fn display(&mut self, title: &str, message: &str) {
        if self.active.is_some() {
            log::info!("Double alert, not showing '{}'", message);
            return;
        }
        self.active = Some(ActiveDialog {
            view: DialogView {
                kind: DialogKind::Alert,
                title: title.to_string(),
                message: message.to_string(),
            },
            action: None,
        });
    }
}
