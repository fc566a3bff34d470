use gtk::gdk;
use gtk4 as gtk;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Copy,
    Save,
    Recapture,
    Clone,
    Close,
    Cancel,
}

impl Action {
    pub fn label(&self) -> &str {
        match self {
            Action::Copy => "Copy to Clipboard",
            Action::Save => "Save to File",
            Action::Recapture => "Recapture",
            Action::Clone => "Clone",
            Action::Close => "Close Snapshot",
            Action::Cancel => "Cancel Selection",
        }
    }

    /// Name of the snapshot window action triggered by this shortcut
    pub fn action_name(&self) -> Option<&'static str> {
        match self {
            Action::Copy => Some("snap.copy"),
            Action::Save => Some("snap.save"),
            Action::Recapture => Some("snap.recapture"),
            Action::Clone => Some("snap.clone"),
            Action::Close => Some("snap.close"),
            Action::Cancel => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: gdk::Key,
    pub modifiers: gdk::ModifierType,
}

#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    bindings: HashMap<Action, Shortcut>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(
            Action::Copy,
            Shortcut {
                key: gdk::Key::c,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );
        bindings.insert(
            Action::Save,
            Shortcut {
                key: gdk::Key::s,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );
        bindings.insert(
            Action::Recapture,
            Shortcut {
                key: gdk::Key::F5,
                modifiers: gdk::ModifierType::empty(),
            },
        );
        bindings.insert(
            Action::Clone,
            Shortcut {
                key: gdk::Key::d,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );
        bindings.insert(
            Action::Close,
            Shortcut {
                key: gdk::Key::w,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );
        bindings.insert(
            Action::Cancel,
            Shortcut {
                key: gdk::Key::Escape,
                modifiers: gdk::ModifierType::empty(),
            },
        );

        Self { bindings }
    }
}

/// Modifiers that carry meaning; NumLock/CapsLock/ScrollLock are ignored
fn clean_modifiers(modifiers: gdk::ModifierType) -> gdk::ModifierType {
    let mask = gdk::ModifierType::CONTROL_MASK
        | gdk::ModifierType::SHIFT_MASK
        | gdk::ModifierType::ALT_MASK
        | gdk::ModifierType::SUPER_MASK
        | gdk::ModifierType::META_MASK;

    modifiers & mask
}

impl ShortcutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_action(&self, key: gdk::Key, modifiers: gdk::ModifierType) -> Option<Action> {
        let clean_mods = clean_modifiers(modifiers);

        self.bindings
            .iter()
            .find(|(_, shortcut)| shortcut.key == key && shortcut.modifiers == clean_mods)
            .map(|(action, _)| *action)
    }

    pub fn get_shortcut_label(&self, action: Action) -> String {
        if let Some(sc) = self.bindings.get(&action) {
            return gtk::accelerator_name(sc.key, sc.modifiers).to_string();
        }
        String::new()
    }

    /// Accelerator strings for `gtk::Application::set_accels_for_action`
    pub fn accelerators(&self) -> Vec<(&'static str, String)> {
        let mut accels: Vec<_> = self
            .bindings
            .iter()
            .filter_map(|(action, sc)| {
                action
                    .action_name()
                    .map(|name| (name, gtk::accelerator_name(sc.key, sc.modifiers).to_string()))
            })
            .collect();
        accels.sort();
        accels
    }
}

/// How long to wait before a snip session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnipDelay {
    #[default]
    Immediate,
    Short,
    Long,
}

impl SnipDelay {
    /// Ctrl delays by a few seconds, Ctrl+Shift by ten; anything else snips
    /// right away.
    pub fn from_modifiers(modifiers: gdk::ModifierType) -> Self {
        let ctrl = gdk::ModifierType::CONTROL_MASK;
        let ctrl_shift = ctrl | gdk::ModifierType::SHIFT_MASK;

        let mods = clean_modifiers(modifiers);
        if mods == ctrl {
            SnipDelay::Short
        } else if mods == ctrl_shift {
            SnipDelay::Long
        } else {
            SnipDelay::Immediate
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            SnipDelay::Immediate => None,
            SnipDelay::Short => Some(Duration::from_secs(3)),
            SnipDelay::Long => Some(Duration::from_secs(10)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnipDelay::Immediate => "Snip",
            SnipDelay::Short => "Snip in 3 Seconds",
            SnipDelay::Long => "Snip in 10 Seconds",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_from_modifiers() {
        let ctrl = gdk::ModifierType::CONTROL_MASK;
        let shift = gdk::ModifierType::SHIFT_MASK;
        let capslock = gdk::ModifierType::LOCK_MASK;

        assert_eq!(SnipDelay::from_modifiers(gdk::ModifierType::empty()), SnipDelay::Immediate);
        assert_eq!(SnipDelay::from_modifiers(ctrl), SnipDelay::Short);
        assert_eq!(SnipDelay::from_modifiers(ctrl | capslock), SnipDelay::Short);
        assert_eq!(SnipDelay::from_modifiers(ctrl | shift), SnipDelay::Long);
        assert_eq!(SnipDelay::from_modifiers(shift), SnipDelay::Immediate);
        assert_eq!(
            SnipDelay::from_modifiers(ctrl | gdk::ModifierType::ALT_MASK),
            SnipDelay::Immediate
        );
    }

    #[test]
    fn test_delay_durations() {
        assert_eq!(SnipDelay::Immediate.duration(), None);
        assert_eq!(SnipDelay::Short.duration(), Some(Duration::from_secs(3)));
        assert_eq!(SnipDelay::Long.duration(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_shortcut_lookup_ignores_lock_keys() {
        let config = ShortcutConfig::new();
        let mods = gdk::ModifierType::CONTROL_MASK | gdk::ModifierType::LOCK_MASK;
        assert_eq!(config.get_action(gdk::Key::c, mods), Some(Action::Copy));
        assert_eq!(
            config.get_action(gdk::Key::Escape, gdk::ModifierType::empty()),
            Some(Action::Cancel)
        );
        assert_eq!(
            config.get_action(gdk::Key::q, gdk::ModifierType::empty()),
            None
        );
    }

    #[test]
    fn test_cancel_has_no_window_action() {
        assert_eq!(Action::Cancel.action_name(), None);
        for action in [
            Action::Copy,
            Action::Save,
            Action::Recapture,
            Action::Clone,
            Action::Close,
        ] {
            assert!(action.action_name().unwrap().starts_with("snap."));
        }
    }
}
