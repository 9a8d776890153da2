//! Blocking browser dialogs: `window.confirm` and `window.alert`.

pub trait Dialogs {
    /// Ask a yes/no question. `false` when the user cancels.
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(message);
        }
    }
}

/// Answers every `confirm` with a fixed reply and records what was shown.
#[cfg(test)]
pub struct ScriptedDialogs {
    pub answer: bool,
    pub shown: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl ScriptedDialogs {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            shown: std::cell::RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl Dialogs for ScriptedDialogs {
    fn confirm(&self, message: &str) -> bool {
        self.shown.borrow_mut().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.shown.borrow_mut().push(message.to_string());
    }
}
