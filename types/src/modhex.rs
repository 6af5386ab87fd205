//! Modhex keyboard-layout translation.
//!
//! A token emits the same sixteen physical keystrokes regardless of the host
//! keyboard layout, so the literal string an application receives depends on
//! the layout the user has configured. Each [`KeyboardLayout`] records what the
//! sixteen modhex keys produce under that layout, position for position.
//!
//! Translation maps an input back onto the canonical (QWERTY) modhex alphabet
//! under every layout that can explain all of its characters.

use std::collections::BTreeSet;

/// The canonical modhex alphabet, in nibble order (`c` = 0x0 .. `v` = 0xf).
pub const MODHEX_ALPHABET: &str = "cbdefghijklnrtuv";

/// A keyboard layout and the characters the modhex keys produce under it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardLayout {
    pub name: &'static str,
    /// Sixteen characters, index-aligned with [`MODHEX_ALPHABET`].
    pub alphabet: &'static str,
}

/// US QWERTY: the identity layout.
pub const QWERTY: KeyboardLayout = KeyboardLayout {
    name: "qwerty",
    alphabet: MODHEX_ALPHABET,
};

/// US Dvorak: the modhex keys as seen by a host configured for Dvorak.
pub const DVORAK: KeyboardLayout = KeyboardLayout {
    name: "dvorak",
    alphabet: "jxe.uidchtnbpygk",
};

/// All layouts the translator tries.
pub const KNOWN_LAYOUTS: &[KeyboardLayout] = &[QWERTY, DVORAK];

impl KeyboardLayout {
    /// Translate `input` to canonical modhex, or `None` if some character
    /// cannot be produced by a modhex key under this layout.
    pub fn to_modhex(&self, input: &str) -> Option<String> {
        let canonical = MODHEX_ALPHABET.as_bytes();
        input
            .chars()
            .map(|c| {
                self.alphabet
                    .chars()
                    .position(|a| a == c)
                    .map(|idx| canonical[idx] as char)
            })
            .collect()
    }
}

/// Every canonical modhex reading of `input` across [`KNOWN_LAYOUTS`].
///
/// Returned as an ordered set, so iteration order is stable.
pub fn interpretations(input: &str) -> BTreeSet<String> {
    KNOWN_LAYOUTS
        .iter()
        .filter_map(|layout| layout.to_modhex(input))
        .collect()
}

/// Best-effort normalization of a token string to canonical modhex.
///
/// - no interpretation: the input is returned unchanged
/// - one interpretation: that interpretation
/// - several: the input itself if it is one of them, otherwise the
///   lexicographically smallest candidate
pub fn normalize(input: &str) -> String {
    let candidates = interpretations(input);
    if candidates.contains(input) {
        return input.to_string();
    }
    candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| input.to_string())
}

/// Whether every character of `input` belongs to the canonical alphabet.
pub fn is_modhex(input: &str) -> bool {
    input.chars().all(|c| MODHEX_ALPHABET.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_cover_sixteen_distinct_keys() {
        for layout in KNOWN_LAYOUTS {
            let unique: BTreeSet<char> = layout.alphabet.chars().collect();
            assert_eq!(unique.len(), 16, "layout {}", layout.name);
        }
    }

    #[test]
    fn dvorak_token_translates_to_qwerty() {
        assert_eq!(
            normalize("jjjjjjjjnhe.ngcgjeiuujjjdtgihjuecyixinxunkhj"),
            "ccccccccljdeluiucdgffccchkugjcfditgbglbflvjc"
        );
    }

    #[test]
    fn qwerty_token_is_kept() {
        let otp = "vvbtbtndhtlfguefgluvbdcetnitidgkvfkbicevgcin";
        assert_eq!(normalize(otp), otp);
    }

    #[test]
    fn foreign_characters_leave_input_unchanged() {
        let otp = "cccagvgitchndibrrtuhdrgeufrdkrjfgutfjbnhhglv";
        assert!(interpretations(otp).is_empty());
        assert_eq!(normalize(otp), otp);
    }

    #[test]
    fn ambiguous_input_prefers_itself() {
        // Every character here is valid under both layouts.
        let otp = "cccccccc";
        let candidates = interpretations(otp);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains("iiiiiiii"));
        assert_eq!(normalize(otp), otp);
    }

    #[test]
    fn is_modhex_checks_alphabet() {
        assert!(is_modhex("cbdefghijklnrtuv"));
        assert!(!is_modhex("abc"));
    }
}
