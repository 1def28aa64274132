//! Typographic entity table and tokenizer.
//!
//! A single alternation regex of the escaped literals serves both the cheap
//! "contains any entity" test and the tokenizer. Alternatives are tried in
//! table order at each position (leftmost-first), so `...` is only matched
//! as a whole and a lone `.` never fires.

use std::sync::LazyLock;

use regex::Regex;

/// A literal character sequence and its encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub literal: &'static str,
    pub encoded: &'static str,
}

/// The replaced sequences, in matching priority order.
const STANDARD: [Entity; 5] = [
    Entity { literal: "—", encoded: "&mdash;" },
    Entity { literal: "–", encoded: "&ndash;" },
    Entity { literal: "\"", encoded: "&quot;" },
    Entity { literal: "'", encoded: "&apos;" },
    Entity { literal: "...", encoded: "&hellip;" },
];

/// Shared standard table, compiled on first use.
pub static ENTITIES: LazyLock<EntityTable> = LazyLock::new(EntityTable::standard);

/// Ordered entity table with its compiled matcher.
#[derive(Debug, Clone)]
pub struct EntityTable {
    entries: &'static [Entity],
    pattern: Regex,
}

impl EntityTable {
    fn standard() -> Self {
        let alternation = STANDARD
            .iter()
            .map(|entity| regex::escape(entity.literal))
            .collect::<Vec<_>>()
            .join("|");

        Self {
            entries: &STANDARD,
            pattern: Regex::new(&alternation).unwrap(),
        }
    }

    /// Entries in priority order.
    pub fn entries(&self) -> &'static [Entity] {
        self.entries
    }

    /// Whether `text` contains at least one entity literal.
    #[inline]
    pub fn contains_entity(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Entity for an exact literal.
    pub fn lookup(&self, literal: &str) -> Option<&'static Entity> {
        self.entries.iter().find(|entity| entity.literal == literal)
    }

    /// Split `text` into `(plain run, entity)` tokens, left to right.
    ///
    /// Every token but possibly the last carries an entity; the last one
    /// holds trailing plain text. An empty input yields no tokens.
    pub fn tokenize<'a, 't>(&'a self, text: &'t str) -> Tokens<'a, 't> {
        Tokens {
            table: self,
            text,
            matches: self.pattern.find_iter(text),
            last: 0,
            done: false,
        }
    }
}

/// One plain-text run followed by at most one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    pub entity: Option<&'static Entity>,
}

/// Iterator returned by [`EntityTable::tokenize`].
pub struct Tokens<'a, 't> {
    table: &'a EntityTable,
    text: &'t str,
    matches: regex::Matches<'a, 't>,
    last: usize,
    done: bool,
}

impl<'t> Iterator for Tokens<'_, 't> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.matches.next() {
            Some(m) => {
                let text = &self.text[self.last..m.start()];
                self.last = m.end();
                Some(Token {
                    text,
                    entity: self.table.lookup(m.as_str()),
                })
            }
            None => {
                self.done = true;
                (self.last < self.text.len()).then(|| Token {
                    text: &self.text[self.last..],
                    entity: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render tokens as `text|encoded` pairs for compact assertions.
    fn pairs(text: &str) -> Vec<(&str, Option<&'static str>)> {
        ENTITIES
            .tokenize(text)
            .map(|t| (t.text, t.entity.map(|e| e.encoded)))
            .collect()
    }

    #[test]
    fn test_contains_entity() {
        assert!(ENTITIES.contains_entity("a — b"));
        assert!(ENTITIES.contains_entity("en – dash"));
        assert!(ENTITIES.contains_entity("it's"));
        assert!(ENTITIES.contains_entity("say \"hi\""));
        assert!(ENTITIES.contains_entity("wait..."));
        assert!(!ENTITIES.contains_entity("no entities here"));
        assert!(!ENTITIES.contains_entity("a.b.c"));
        assert!(!ENTITIES.contains_entity(".."));
        assert!(!ENTITIES.contains_entity(""));
    }

    #[test]
    fn test_tokenize_mixed() {
        assert_eq!(
            pairs("a — b \"c\""),
            vec![
                ("a ", Some("&mdash;")),
                (" b ", Some("&quot;")),
                ("c", Some("&quot;")),
            ]
        );
    }

    #[test]
    fn test_tokenize_trailing_text() {
        assert_eq!(
            pairs("it's fine"),
            vec![("it", Some("&apos;")), ("s fine", None)]
        );
    }

    #[test]
    fn test_tokenize_adjacent_entities() {
        assert_eq!(
            pairs("—–"),
            vec![("", Some("&mdash;")), ("", Some("&ndash;"))]
        );
    }

    #[test]
    fn test_tokenize_ellipsis_is_whole_run_only() {
        assert_eq!(pairs("a..b"), vec![("a..b", None)]);
        assert_eq!(
            pairs("so...."),
            vec![("so", Some("&hellip;")), (".", None)]
        );
        assert_eq!(
            pairs("......"),
            vec![("", Some("&hellip;")), ("", Some("&hellip;"))]
        );
    }

    #[test]
    fn test_tokenize_plain_is_single_run() {
        assert_eq!(pairs("plain"), vec![("plain", None)]);
        assert!(pairs("").is_empty());
    }

    #[test]
    fn test_tokenize_multibyte_neighbours() {
        assert_eq!(
            pairs("é—ü"),
            vec![("é", Some("&mdash;")), ("ü", None)]
        );
    }

    #[test]
    fn test_lookup_by_literal() {
        assert_eq!(ENTITIES.lookup("...").map(|e| e.encoded), Some("&hellip;"));
        assert_eq!(ENTITIES.lookup("\\.\\.\\."), None);
        assert_eq!(ENTITIES.entries().len(), 5);
    }
}
