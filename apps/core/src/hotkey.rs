use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey is empty")]
    Empty,
    #[error("unsupported modifier '{0}'; use Mod, Ctrl, Alt, Shift, or Meta")]
    UnsupportedModifier(String),
    #[error("unsupported key '{0}'; use A-Z, 0-9, Space, Escape, or F1-F24")]
    UnsupportedKey(String),
}

/// `Mod` is the platform primary modifier: it matches either Ctrl or Meta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Mod,
    Ctrl,
    Alt,
    Shift,
    Meta,
}

impl Modifier {
    fn label(self) -> &'static str {
        match self {
            Self::Mod => "Mod",
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Meta => "Meta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub modifiers: BTreeSet<Modifier>,
    pub key: String,
}

impl Display for KeyCombo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        f.write_str(&self.key)
    }
}

/// Parses `"Mod+K"`, `"ctrl + shift + p"`, or a bare key such as `"t"`.
pub fn parse_hotkey(input: &str) -> Result<KeyCombo, HotkeyError> {
    let parts: Vec<&str> = input
        .split('+')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();

    let Some((key_raw, modifier_parts)) = parts.split_last() else {
        return Err(HotkeyError::Empty);
    };

    let mut modifiers = BTreeSet::new();
    for part in modifier_parts {
        modifiers.insert(normalize_modifier(part)?);
    }

    Ok(KeyCombo {
        modifiers,
        key: normalize_key(key_raw)?,
    })
}

/// Canonical text form, e.g. `" shift + ctrl + p "` becomes `"Ctrl+Shift+P"`.
pub fn validate_hotkey(input: &str) -> Result<String, HotkeyError> {
    parse_hotkey(input).map(|combo| combo.to_string())
}

fn normalize_modifier(input: &str) -> Result<Modifier, HotkeyError> {
    match input.to_ascii_lowercase().as_str() {
        "mod" | "cmdorctrl" | "primary" => Ok(Modifier::Mod),
        "ctrl" | "control" => Ok(Modifier::Ctrl),
        "alt" | "option" => Ok(Modifier::Alt),
        "shift" => Ok(Modifier::Shift),
        "meta" | "cmd" | "command" | "super" | "win" => Ok(Modifier::Meta),
        _ => Err(HotkeyError::UnsupportedModifier(input.to_string())),
    }
}

pub fn normalize_key(input: &str) -> Result<String, HotkeyError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(HotkeyError::Empty);
    }

    let upper = raw.to_ascii_uppercase();
    match upper.as_str() {
        "SPACE" => return Ok("Space".to_string()),
        "ESC" | "ESCAPE" => return Ok("Escape".to_string()),
        _ => {}
    }

    if let Some(number) = upper.strip_prefix('F') {
        if let Ok(parsed) = number.parse::<u8>() {
            if (1..=24).contains(&parsed) {
                return Ok(format!("F{parsed}"));
            }
            return Err(HotkeyError::UnsupportedKey(raw.to_string()));
        }
    }

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(upper);
        }
    }

    Err(HotkeyError::UnsupportedKey(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_hotkey, validate_hotkey, HotkeyError, Modifier};

    #[test]
    fn parses_primary_modifier_combo() {
        let parsed = parse_hotkey("Mod+k").unwrap();
        assert_eq!(parsed.key, "K");
        assert!(parsed.modifiers.contains(&Modifier::Mod));
    }

    #[test]
    fn canonicalizes_modifier_order() {
        assert_eq!(validate_hotkey(" shift + ctrl + p ").unwrap(), "Ctrl+Shift+P");
        assert_eq!(validate_hotkey("esc").unwrap(), "Escape");
    }

    #[test]
    fn bare_letter_is_a_valid_combo() {
        let parsed = parse_hotkey("t").unwrap();
        assert!(parsed.modifiers.is_empty());
        assert_eq!(parsed.key, "T");
    }

    #[test]
    fn rejects_unknown_parts() {
        assert_eq!(
            parse_hotkey("Hyper+K"),
            Err(HotkeyError::UnsupportedModifier("Hyper".to_string()))
        );
        assert!(matches!(parse_hotkey("Ctrl+F30"), Err(HotkeyError::UnsupportedKey(_))));
        assert_eq!(parse_hotkey(" + "), Err(HotkeyError::Empty));
    }
}
