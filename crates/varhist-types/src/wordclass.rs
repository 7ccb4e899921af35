//! The fixed wordclass tagging scheme.

use std::fmt;

/// Grammatical category of a headword, using the fixed tag set found in the
/// source data (`NN`, `VB`, `JJ`, ...).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Wordclass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Phrase,
}

impl Wordclass {
    /// Parse a source tag into a wordclass.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NN" => Some(Wordclass::Noun),
            "VB" => Some(Wordclass::Verb),
            "JJ" => Some(Wordclass::Adjective),
            "RB" => Some(Wordclass::Adverb),
            "PN" => Some(Wordclass::Pronoun),
            "IN" => Some(Wordclass::Preposition),
            "CC" => Some(Wordclass::Conjunction),
            "UH" => Some(Wordclass::Interjection),
            "PHR" => Some(Wordclass::Phrase),
            _ => None,
        }
    }

    /// Emit the tag used in the source data and the cache format.
    pub fn tag(self) -> &'static str {
        match self {
            Wordclass::Noun => "NN",
            Wordclass::Verb => "VB",
            Wordclass::Adjective => "JJ",
            Wordclass::Adverb => "RB",
            Wordclass::Pronoun => "PN",
            Wordclass::Preposition => "IN",
            Wordclass::Conjunction => "CC",
            Wordclass::Interjection => "UH",
            Wordclass::Phrase => "PHR",
        }
    }
}

impl fmt::Display for Wordclass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Wordclass::Noun => "noun",
            Wordclass::Verb => "verb",
            Wordclass::Adjective => "adjective",
            Wordclass::Adverb => "adverb",
            Wordclass::Pronoun => "pronoun",
            Wordclass::Preposition => "preposition",
            Wordclass::Conjunction => "conjunction",
            Wordclass::Interjection => "interjection",
            Wordclass::Phrase => "phrase",
        })
    }
}
