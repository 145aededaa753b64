use crate::constants::KEY_COUNT;

/// # Keypad
/// Held state of the 16 hexadecimal keys.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// Only the input source writes it; instructions just read it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held state of every key at once
    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// Only the low nibble of `key` selects the key
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// The lowest numbered key that is held, if any
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&held| held).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_key_to_nibble() {
        let mut keypad = Keypad::new();
        let mut keys = [false; KEY_COUNT];
        keys[0xE] = true;
        keypad.set_all(keys);
        assert!(keypad.is_pressed(0xE));
        assert!(keypad.is_pressed(0xFE));
        assert!(!keypad.is_pressed(0x0));
    }

    #[test]
    fn test_first_pressed_is_lowest() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.first_pressed(), None);
        let mut keys = [false; KEY_COUNT];
        keys[0x9] = true;
        keys[0x3] = true;
        keypad.set_all(keys);
        assert_eq!(keypad.first_pressed(), Some(0x3));
    }
}
