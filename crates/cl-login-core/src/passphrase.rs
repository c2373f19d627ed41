//! Passphrase grid state machine.
//!
//! Twelve word cells edited one key event at a time. Typing a space jumps to
//! the next cell, pasting several words spreads them over the following cells,
//! and backspace at the start of a cell steps back to the previous one.
//!
//! The grid owns the cell values. Callers copy what the user typed into the
//! grid with [`PassphraseGrid::set_cell`] before handing it a key-up, then
//! write [`PassphraseGrid::cells`] back out.

use zeroize::Zeroize;

pub const CELL_COUNT: usize = 12;
pub const LAST_CELL: usize = CELL_COUNT - 1;
pub const INVALID_MESSAGE: &str = "Some passphrase inputs were invalid";

/// The key-down events the grid reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    /// Backspace; `caret_at_start` when the cursor sits at offset 0 with nothing selected.
    Backspace { caret_at_start: bool },
    Space,
    Other,
}

impl KeyPress {
    /// Classify a key from its `KeyboardEvent.key` value and the input's selection.
    ///
    /// A missing selection counts as offset 0.
    pub fn from_key(key: &str, selection_start: Option<u32>, selection_end: Option<u32>) -> Self {
        match key {
            "Backspace" => KeyPress::Backspace {
                caret_at_start: selection_start.unwrap_or(0) == 0
                    && selection_end.unwrap_or(0) == 0,
            },
            " " | "Spacebar" => KeyPress::Space,
            _ => KeyPress::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyDownOutcome {
    pub prevent_default: bool,
    pub focus: Option<usize>,
    /// Cell whose value was wiped and must be re-rendered.
    pub cleared: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyUpOutcome {
    pub focus: Option<usize>,
    pub passphrase: String,
}

pub struct PassphraseGrid {
    cells: Vec<String>,
    passphrase: String,
    show: bool,
    validate: bool,
}

impl Default for PassphraseGrid {
    fn default() -> Self {
        Self {
            cells: vec![String::new(); CELL_COUNT],
            passphrase: String::new(),
            show: false,
            validate: false,
        }
    }
}

impl Drop for PassphraseGrid {
    fn drop(&mut self) {
        self.cells.zeroize();
        self.passphrase.zeroize();
    }
}

fn overwrite(cell: &mut String, value: &str) {
    cell.zeroize();
    cell.push_str(value);
}

impl PassphraseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn set_cell(&mut self, index: usize, value: &str) {
        if let Some(cell) = self.cells.get_mut(index) {
            if cell != value {
                overwrite(cell, value);
            }
        }
    }

    /// Aggregated passphrase as of the last key-up.
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn toggle_show(&mut self) -> bool {
        self.show = !self.show;
        self.show
    }

    pub fn set_validate(&mut self, validate: bool) -> Option<&'static str> {
        self.validate = validate;
        self.error()
    }

    pub fn cell_has_error(&self, index: usize) -> bool {
        self.validate && self.cells.get(index).is_some_and(|cell| cell.is_empty())
    }

    /// Message for the `error` attribute while validation is on and a cell is empty.
    pub fn error(&self) -> Option<&'static str> {
        (0..CELL_COUNT)
            .any(|index| self.cell_has_error(index))
            .then_some(INVALID_MESSAGE)
    }

    pub fn key_down(&mut self, index: usize, key: KeyPress) -> KeyDownOutcome {
        let index = index.min(LAST_CELL);
        match key {
            KeyPress::Backspace {
                caret_at_start: true,
            } => KeyDownOutcome {
                focus: Some(index.saturating_sub(1)),
                ..KeyDownOutcome::default()
            },
            KeyPress::Space => {
                let next = index + 1;
                if next < CELL_COUNT {
                    self.cells[next].zeroize();
                    KeyDownOutcome {
                        prevent_default: true,
                        focus: Some(next),
                        cleared: Some(next),
                    }
                } else {
                    KeyDownOutcome {
                        prevent_default: true,
                        ..KeyDownOutcome::default()
                    }
                }
            }
            _ => KeyDownOutcome::default(),
        }
    }

    /// Split the cell at `index` on spaces and spread the words forward.
    ///
    /// Words past the last cell are dropped. Focus goes to the cell after the
    /// last word, one earlier when the second word is empty, and that cell is
    /// cleared; a target past the grid focuses the last cell untouched.
    pub fn key_up(&mut self, index: usize) -> KeyUpOutcome {
        let index = index.min(LAST_CELL);
        let mut words: Vec<String> = self.cells[index].split(' ').map(str::to_owned).collect();
        if words.len() < 2 {
            words.zeroize();
            return KeyUpOutcome {
                focus: None,
                passphrase: self.update_passphrase(),
            };
        }

        let back = usize::from(words[1].is_empty());
        for (offset, word) in words.iter().enumerate() {
            if let Some(cell) = self.cells.get_mut(index + offset) {
                overwrite(cell, word);
            }
        }

        let target = index + words.len() - back;
        words.zeroize();
        let focus = if target < CELL_COUNT {
            self.cells[target].zeroize();
            target
        } else {
            LAST_CELL
        };

        KeyUpOutcome {
            focus: Some(focus),
            passphrase: self.update_passphrase(),
        }
    }

    fn update_passphrase(&mut self) -> String {
        self.passphrase.zeroize();
        self.passphrase = self.cells.join(" ");
        self.passphrase.clone()
    }
}
