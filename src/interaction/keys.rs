use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A key reported by the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Left,
    Up,
    Right,
    Down,
    /// The window was closed by the user or the event stream ended.
    Close,
    Other(u32),
}

impl Key {
    pub const ARROW_LEFT_CODE: u32 = 65361;
    pub const ARROW_UP_CODE: u32 = 65362;
    pub const ARROW_RIGHT_CODE: u32 = 65363;
    pub const ARROW_DOWN_CODE: u32 = 65364;

    /// Maps a raw toolkit key code. Only the low 16 bits are significant.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code & 0xffff {
            Self::ARROW_LEFT_CODE => Self::Left,
            Self::ARROW_UP_CODE => Self::Up,
            Self::ARROW_RIGHT_CODE => Self::Right,
            Self::ARROW_DOWN_CODE => Self::Down,
            masked => match char::from_u32(masked) {
                Some(c) if c.is_ascii_graphic() || c == ' ' => Self::Char(c),
                _ => Self::Other(masked),
            },
        }
    }

    /// Short label used in help overlays.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Left => "left".to_owned(),
            Self::Up => "up".to_owned(),
            Self::Right => "right".to_owned(),
            Self::Down => "down".to_owned(),
            Self::Close => "close".to_owned(),
            Self::Other(code) => format!("#{code}"),
        }
    }
}

/// Ordered key -> action table. Iteration order is insertion order, which
/// is also the order help text lists the bindings in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings<A> {
    bindings: IndexMap<Key, (A, &'static str)>,
}

impl<A: Copy> KeyBindings<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: Key, action: A, description: &'static str) -> Self {
        self.bind(key, action, description);
        self
    }

    /// Binds `key`, replacing any previous binding in place.
    pub fn bind(&mut self, key: Key, action: A, description: &'static str) {
        self.bindings.insert(key, (action, description));
    }

    pub fn unbind(&mut self, key: Key) -> Option<A> {
        self.bindings.shift_remove(&key).map(|(action, _)| action)
    }

    #[must_use]
    pub fn resolve(&self, key: Key) -> Option<A> {
        self.bindings.get(&key).map(|(action, _)| *action)
    }

    /// `"<key>: <description>"` lines in binding order.
    #[must_use]
    pub fn help_lines(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|(key, (_, description))| format!("{}: {description}", key.label()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<A: Copy> Default for KeyBindings<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, KeyBindings};

    #[test]
    fn raw_codes_map_to_keys() {
        assert_eq!(Key::from_code(u32::from(b'q')), Key::Char('q'));
        assert_eq!(Key::from_code(65361), Key::Left);
        assert_eq!(Key::from_code(0x0010_0000 | 65364), Key::Down);
        assert_eq!(Key::from_code(27), Key::Other(27));
    }

    #[test]
    fn help_lines_follow_binding_order() {
        let bindings = KeyBindings::new()
            .with(Key::Char('h'), 1, "toggle help")
            .with(Key::Char('q'), 2, "quit");
        assert_eq!(bindings.help_lines(), vec!["h: toggle help", "q: quit"]);
        assert_eq!(bindings.resolve(Key::Char('q')), Some(2));
        assert_eq!(bindings.resolve(Key::Char('x')), None);
    }
}
