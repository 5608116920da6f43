use super::types::{ButtonId, InputPoller};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Script {
    held: HashSet<ButtonId>,
    pending: HashMap<ButtonId, u32>,
    queries: HashMap<ButtonId, u32>,
}

/// Button source driven from test code.
///
/// Clones share state, so a test can keep a handle while the session owns
/// the poller.
#[derive(Debug, Clone, Default)]
pub struct ScriptedButtons {
    script: Arc<Mutex<Script>>,
}

impl ScriptedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next query of `button` reads pressed, once
    pub fn press_once(&self, button: ButtonId) {
        if let Ok(mut script) = self.script.lock() {
            *script.pending.entry(button).or_insert(0) += 1;
        }
    }

    /// `button` reads pressed until released
    pub fn hold(&self, button: ButtonId) {
        if let Ok(mut script) = self.script.lock() {
            script.held.insert(button);
        }
    }

    pub fn release(&self, button: ButtonId) {
        if let Ok(mut script) = self.script.lock() {
            script.held.remove(&button);
        }
    }

    /// How many times `button` has been queried
    pub fn queries(&self, button: ButtonId) -> u32 {
        self.script
            .lock()
            .map(|script| script.queries.get(&button).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl InputPoller for ScriptedButtons {
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        let Ok(mut script) = self.script.lock() else {
            return false;
        };
        *script.queries.entry(button).or_insert(0) += 1;

        if script.held.contains(&button) {
            return true;
        }
        match script.pending.get_mut(&button) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}
