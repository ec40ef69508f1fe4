//! src/core/keys.rs
//!
//! Virtual key identifiers and capability classification
//!
//! This module defines the fundamental key types used throughout the engine:
//! - `VirtualKey`: an opaque 32-bit key identifier (OS virtual-key code)
//! - `ModifierFamily`: the four combined modifier types (Ctrl, Alt, Shift, Win)
//! - `ModifierSide`: left/right variants and the combined generic form
//! - `KeyCapability`: what a key may do inside a shortcut
//!
//! Left and right modifier variants are distinct identifiers that alias to a
//! combined family; the Win family has no OS-defined combined code, so the
//! engine reserves a pseudo-code for it outside the OS virtual-key range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 32-bit virtual-key identifier.
///
/// Key codes are treated purely as comparable identifiers; no platform
/// validity guarantees beyond equality are assumed. Codes below 0x100 follow
/// the usual OS virtual-key assignments, codes at 0x100 and above are
/// engine-reserved sentinels.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct VirtualKey(pub u32);

impl VirtualKey {
    pub const SHIFT: VirtualKey = VirtualKey(0x10);
    pub const CONTROL: VirtualKey = VirtualKey(0x11);
    pub const ALT: VirtualKey = VirtualKey(0x12);
    pub const LSHIFT: VirtualKey = VirtualKey(0xA0);
    pub const RSHIFT: VirtualKey = VirtualKey(0xA1);
    pub const LCONTROL: VirtualKey = VirtualKey(0xA2);
    pub const RCONTROL: VirtualKey = VirtualKey(0xA3);
    pub const LALT: VirtualKey = VirtualKey(0xA4);
    pub const RALT: VirtualKey = VirtualKey(0xA5);
    pub const LWIN: VirtualKey = VirtualKey(0x5B);
    pub const RWIN: VirtualKey = VirtualKey(0x5C);

    /// Reserved sentinel: a key remapped to "nothing".
    pub const DISABLED: VirtualKey = VirtualKey(0x100);
    /// Combined Win form; the OS defines no generic Win virtual key.
    pub const WIN: VirtualKey = VirtualKey(0x104);

    pub const RETURN: VirtualKey = VirtualKey(0x0D);
    pub const ESCAPE: VirtualKey = VirtualKey(0x1B);
    pub const SPACE: VirtualKey = VirtualKey(0x20);
    pub const TAB: VirtualKey = VirtualKey(0x09);
    pub const BACKSPACE: VirtualKey = VirtualKey(0x08);
    pub const CAPS_LOCK: VirtualKey = VirtualKey(0x14);

    /// Classifies what this key may do inside a shortcut.
    pub fn capability(self) -> KeyCapability {
        use ModifierFamily::*;
        use ModifierSide::*;

        match self {
            Self::DISABLED => KeyCapability::Disabled,
            Self::SHIFT => KeyCapability::Modifier(Shift, Either),
            Self::LSHIFT => KeyCapability::Modifier(Shift, Left),
            Self::RSHIFT => KeyCapability::Modifier(Shift, Right),
            Self::CONTROL => KeyCapability::Modifier(Ctrl, Either),
            Self::LCONTROL => KeyCapability::Modifier(Ctrl, Left),
            Self::RCONTROL => KeyCapability::Modifier(Ctrl, Right),
            Self::ALT => KeyCapability::Modifier(Alt, Either),
            Self::LALT => KeyCapability::Modifier(Alt, Left),
            Self::RALT => KeyCapability::Modifier(Alt, Right),
            Self::WIN => KeyCapability::Modifier(Win, Either),
            Self::LWIN => KeyCapability::Modifier(Win, Left),
            Self::RWIN => KeyCapability::Modifier(Win, Right),
            _ => KeyCapability::Action,
        }
    }

    /// The modifier family this key aliases to, if it is a modifier.
    pub fn family(self) -> Option<ModifierFamily> {
        match self.capability() {
            KeyCapability::Modifier(family, _) => Some(family),
            _ => None,
        }
    }

    /// The left/right/combined variant of a modifier key.
    pub fn side(self) -> Option<ModifierSide> {
        match self.capability() {
            KeyCapability::Modifier(_, side) => Some(side),
            _ => None,
        }
    }

    /// Resolves a modifier to its combined generic form.
    ///
    /// Non-modifier keys resolve to themselves.
    pub fn combined(self) -> VirtualKey {
        match self.family() {
            Some(ModifierFamily::Ctrl) => Self::CONTROL,
            Some(ModifierFamily::Alt) => Self::ALT,
            Some(ModifierFamily::Shift) => Self::SHIFT,
            Some(ModifierFamily::Win) => Self::WIN,
            None => self,
        }
    }

    pub fn is_modifier(self) -> bool {
        matches!(self.capability(), KeyCapability::Modifier(..))
    }

    pub fn is_action(self) -> bool {
        matches!(self.capability(), KeyCapability::Action)
    }

    pub fn is_disabled(self) -> bool {
        self == Self::DISABLED
    }

    /// Resolves a key name to its code.
    ///
    /// Accepts the names produced by [`VirtualKey::name`] plus the common
    /// aliases users type in rules files ("Ctrl", "Control", "Esc", "Super",
    /// single characters, "F1".."F24"). Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<VirtualKey> {
        let trimmed = name.trim();

        // Single letter or digit maps straight to its code
        if trimmed.len() == 1 {
            let c = trimmed.chars().next()?;
            if c.is_ascii_alphanumeric() {
                return Some(VirtualKey(c.to_ascii_uppercase() as u32));
            }
        }

        let lower = trimmed.to_lowercase();

        // Function keys F1..F24
        if let Some(n) = lower.strip_prefix('f') {
            if let Ok(n) = n.parse::<u32>() {
                if (1..=24).contains(&n) {
                    return Some(VirtualKey(0x70 + n - 1));
                }
            }
        }

        let code = match lower.as_str() {
            "ctrl" | "control" => 0x11,
            "lctrl" | "leftctrl" | "leftcontrol" => 0xA2,
            "rctrl" | "rightctrl" | "rightcontrol" => 0xA3,
            "alt" | "menu" => 0x12,
            "lalt" | "leftalt" => 0xA4,
            "ralt" | "rightalt" => 0xA5,
            "shift" => 0x10,
            "lshift" | "leftshift" => 0xA0,
            "rshift" | "rightshift" => 0xA1,
            "win" | "super" => 0x104,
            "lwin" | "leftwin" => 0x5B,
            "rwin" | "rightwin" => 0x5C,
            "disabled" | "disable" => 0x100,
            "enter" | "return" => 0x0D,
            "escape" | "esc" => 0x1B,
            "space" => 0x20,
            "tab" => 0x09,
            "backspace" | "back" => 0x08,
            "capslock" | "caps" => 0x14,
            "delete" | "del" => 0x2E,
            "insert" => 0x2D,
            "home" => 0x24,
            "end" => 0x23,
            "pageup" | "prior" => 0x21,
            "pagedown" | "next" => 0x22,
            "left" => 0x25,
            "up" => 0x26,
            "right" => 0x27,
            "down" => 0x28,
            "printscreen" => 0x2C,
            "numlock" => 0x90,
            "scrolllock" => 0x91,
            _ => return None,
        };

        Some(VirtualKey(code))
    }

    /// Human-readable name for display lists and the CLI.
    pub fn name(self) -> String {
        match self.0 {
            0x10 => "Shift".into(),
            0x11 => "Ctrl".into(),
            0x12 => "Alt".into(),
            0xA0 => "LShift".into(),
            0xA1 => "RShift".into(),
            0xA2 => "LCtrl".into(),
            0xA3 => "RCtrl".into(),
            0xA4 => "LAlt".into(),
            0xA5 => "RAlt".into(),
            0x5B => "LWin".into(),
            0x5C => "RWin".into(),
            0x100 => "Disabled".into(),
            0x104 => "Win".into(),
            0x0D => "Enter".into(),
            0x1B => "Escape".into(),
            0x20 => "Space".into(),
            0x09 => "Tab".into(),
            0x08 => "Backspace".into(),
            0x14 => "CapsLock".into(),
            0x2E => "Delete".into(),
            0x2D => "Insert".into(),
            0x24 => "Home".into(),
            0x23 => "End".into(),
            0x21 => "PageUp".into(),
            0x22 => "PageDown".into(),
            0x25 => "Left".into(),
            0x26 => "Up".into(),
            0x27 => "Right".into(),
            0x28 => "Down".into(),
            0x2C => "PrintScreen".into(),
            0x90 => "NumLock".into(),
            0x91 => "ScrollLock".into(),
            c @ 0x30..=0x39 | c @ 0x41..=0x5A => {
                char::from_u32(c).map(String::from).unwrap_or_default()
            }
            c @ 0x70..=0x87 => format!("F{}", c - 0x70 + 1),
            c => format!("VK 0x{c:02X}"),
        }
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Combined modifier type a left/right variant aliases to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ModifierFamily {
    Ctrl,
    Alt,
    Shift,
    Win,
}

impl fmt::Display for ModifierFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierFamily::Ctrl => write!(f, "Ctrl"),
            ModifierFamily::Alt => write!(f, "Alt"),
            ModifierFamily::Shift => write!(f, "Shift"),
            ModifierFamily::Win => write!(f, "Win"),
        }
    }
}

/// Which physical variant of a modifier a key identifies.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ModifierSide {
    Left,
    Right,
    /// The combined generic form (matches either physical key).
    Either,
}

/// What a key may do inside a shortcut.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyCapability {
    /// Participates in shortcuts, never as the sole action key.
    Modifier(ModifierFamily, ModifierSide),
    /// Any non-modifier key; a shortcut has at most one.
    Action,
    /// Reserved sentinel, only valid as a lone remap target.
    Disabled,
}
