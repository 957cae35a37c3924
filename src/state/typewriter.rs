//! Typewriter State Machine - pure phrase-cycling transitions.
//!
//! Holds only `(phrase_index, char_count, mode)` over a fixed phrase list.
//! The visible text is derived on read by [`TypewriterState::visible_text`],
//! so ticking never touches strings.
//!
//! One tick per timer firing:
//!
//! ```text
//! Typing    char_count += 1, at len + 1 -> Pausing
//! Pausing   -> Deleting (char_count unchanged)
//! Deleting  char_count -= 1, at 0 -> next phrase, Typing
//! ```
//!
//! Typing runs one step past the phrase length before pausing. That extra
//! tick keeps the finished phrase on screen for one more `type_speed`.
//!
//! Characters are extended grapheme clusters.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::Mode;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No phrases, nothing to do.
    Idle,
    /// One more character revealed.
    Revealed,
    /// Reached `len + 1`, now pausing.
    Completed,
    /// Pause over, deletion begins.
    Resumed,
    /// One character retracted.
    Retracted,
    /// Fully deleted, moved on to the given phrase.
    Advanced { phrase_index: usize },
}

/// State of the typewriter cycle over a fixed list of phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterState {
    phrases: Vec<String>,
    /// Grapheme count per phrase
    lengths: Vec<usize>,
    phrase_index: usize,
    char_count: usize,
    mode: Mode,
}

impl TypewriterState {
    /// Initial state: first phrase, nothing typed, Typing.
    pub fn new(phrases: Vec<String>) -> Self {
        let lengths = phrases
            .iter()
            .map(|p| p.graphemes(true).count())
            .collect();
        Self {
            phrases,
            lengths,
            phrase_index: 0,
            char_count: 0,
            mode: Mode::Typing,
        }
    }

    /// An empty phrase list never ticks.
    pub fn is_idle(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The phrase being typed or deleted.
    pub fn active_phrase(&self) -> Option<&str> {
        self.phrases.get(self.phrase_index).map(String::as_str)
    }

    /// Length of the active phrase in characters (0 when idle).
    pub fn active_len(&self) -> usize {
        self.lengths.get(self.phrase_index).copied().unwrap_or(0)
    }

    /// First `char_count` characters of the active phrase.
    pub fn visible_text(&self) -> &str {
        let Some(phrase) = self.active_phrase() else {
            return "";
        };
        let end = phrase
            .grapheme_indices(true)
            .nth(self.char_count)
            .map(|(offset, _)| offset)
            .unwrap_or(phrase.len());
        &phrase[..end]
    }

    /// Apply one tick.
    pub fn tick(&mut self) -> Transition {
        if self.is_idle() {
            return Transition::Idle;
        }

        match self.mode {
            Mode::Typing => {
                self.char_count += 1;
                if self.char_count > self.active_len() {
                    self.mode = Mode::Pausing;
                    Transition::Completed
                } else {
                    Transition::Revealed
                }
            }
            Mode::Pausing => {
                self.mode = Mode::Deleting;
                Transition::Resumed
            }
            Mode::Deleting => {
                self.char_count = self.char_count.saturating_sub(1);
                if self.char_count == 0 {
                    self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                    self.mode = Mode::Typing;
                    Transition::Advanced {
                        phrase_index: self.phrase_index,
                    }
                } else {
                    Transition::Retracted
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(phrases: &[&str]) -> TypewriterState {
        TypewriterState::new(phrases.iter().map(|p| p.to_string()).collect())
    }

    fn snapshot(s: &TypewriterState) -> (Mode, usize, usize, String) {
        (s.mode(), s.phrase_index(), s.char_count(), s.visible_text().to_string())
    }

    #[test]
    fn test_initial_state() {
        let s = state(&["ab", "c"]);
        assert_eq!(snapshot(&s), (Mode::Typing, 0, 0, String::new()));
        assert!(!s.is_idle());
    }

    #[test]
    fn test_idle_never_moves() {
        let mut s = state(&[]);
        assert!(s.is_idle());
        for _ in 0..10 {
            assert_eq!(s.tick(), Transition::Idle);
        }
        assert_eq!(s.visible_text(), "");
        assert_eq!(s.active_phrase(), None);
    }

    #[test]
    fn test_full_cycle_two_phrases() {
        use Mode::*;
        let mut s = state(&["ab", "c"]);

        let expected = [
            (Transition::Revealed, (Typing, 0, 1, "a")),
            (Transition::Revealed, (Typing, 0, 2, "ab")),
            (Transition::Completed, (Pausing, 0, 3, "ab")),
            (Transition::Resumed, (Deleting, 0, 3, "ab")),
            (Transition::Retracted, (Deleting, 0, 2, "ab")),
            (Transition::Retracted, (Deleting, 0, 1, "a")),
            (Transition::Advanced { phrase_index: 1 }, (Typing, 1, 0, "")),
            (Transition::Revealed, (Typing, 1, 1, "c")),
            (Transition::Completed, (Pausing, 1, 2, "c")),
            (Transition::Resumed, (Deleting, 1, 2, "c")),
            (Transition::Retracted, (Deleting, 1, 1, "c")),
            (Transition::Advanced { phrase_index: 0 }, (Typing, 0, 0, "")),
            (Transition::Revealed, (Typing, 0, 1, "a")),
        ];

        for (i, (transition, (mode, index, count, text))) in expected.into_iter().enumerate() {
            assert_eq!(s.tick(), transition, "tick {}", i + 1);
            assert_eq!(
                snapshot(&s),
                (mode, index, count, text.to_string()),
                "tick {}",
                i + 1
            );
        }
    }

    #[test]
    fn test_single_phrase_retypes() {
        let mut s = state(&["x"]);
        let mut advances = 0;
        for _ in 0..20 {
            if let Transition::Advanced { phrase_index } = s.tick() {
                assert_eq!(phrase_index, 0);
                advances += 1;
            }
        }
        // 5 ticks per cycle: reveal, complete, resume, retract, advance
        assert_eq!(advances, 4);
    }

    #[test]
    fn test_char_count_bounds() {
        let mut s = state(&["hello", "", "hi"]);
        for _ in 0..200 {
            s.tick();
            assert!(s.char_count() <= s.active_len() + 1);
            assert!(s.phrase_index() < 3);
        }
    }

    #[test]
    fn test_empty_phrase_in_list() {
        let mut s = state(&[""]);
        assert_eq!(s.tick(), Transition::Completed);
        assert_eq!(s.char_count(), 1);
        assert_eq!(s.visible_text(), "");
        assert_eq!(s.tick(), Transition::Resumed);
        assert_eq!(s.tick(), Transition::Advanced { phrase_index: 0 });
    }

    #[test]
    fn test_graphemes_not_split() {
        let mut s = state(&["e\u{301}🇫🇮!"]);
        assert_eq!(s.active_len(), 3);
        s.tick();
        assert_eq!(s.visible_text(), "e\u{301}");
        s.tick();
        assert_eq!(s.visible_text(), "e\u{301}🇫🇮");
        s.tick();
        assert_eq!(s.visible_text(), "e\u{301}🇫🇮!");
        s.tick();
        assert_eq!(s.mode(), Mode::Pausing);
        assert_eq!(s.visible_text(), "e\u{301}🇫🇮!");
    }
}
