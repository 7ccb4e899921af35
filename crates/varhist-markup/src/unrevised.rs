//! State-machine parser for the unrevised forms dialect.
//!
//! The unrevised grammar predates reliable nesting: a date, grammar note, or
//! label applies to every following form until a boundary resets it, and
//! parenthesized stretches carry their own shadow state. The parser is an
//! explicit finite-state machine over the token stream from
//! [`crate::tokens`], with one [`ScopeState`] per scope (outside and inside
//! parentheses) and an enumerated transition per token type. Every transition
//! is unit-tested directly on token sequences.

use varhist_types::variant::VariantForm;

use crate::dates;
use crate::node::Node;
use crate::tokens::{self, Token};
use crate::unpack;

/// Annotation state for one parenthesis scope.
#[derive(Clone, Debug, Default)]
struct ScopeState {
    date_range: Option<varhist_types::DateRange>,
    grammar: Option<String>,
    label: Option<String>,
}

/// Parse an unrevised subtree into variant forms.
pub fn parse(nodes: &[Node]) -> Vec<VariantForm> {
    parse_tokens(&tokens::tokenize(nodes))
}

/// Run the state machine over a token stream.
///
/// Exposed separately from [`parse`] so transitions can be tested without
/// going through the tokenizer.
pub fn parse_tokens(stream: &[Token]) -> Vec<VariantForm> {
    let mut outside = ScopeState::default();
    let mut inside = ScopeState::default();
    let mut in_parens = false;
    let mut prev_was_label = false;
    let mut forms: Vec<VariantForm> = Vec::new();

    for (i, token) in stream.iter().enumerate() {
        match token {
            Token::Date(text) => {
                let scope = if in_parens { &mut inside } else { &mut outside };
                scope.date_range = dates::parse_date_code(text);
                // A date not introduced by a label starts a fresh run.
                if !prev_was_label {
                    scope.label = None;
                }
            }
            Token::HardBreak => {
                outside = ScopeState::default();
                inside = ScopeState::default();
                in_parens = false;
            }
            Token::SoftBreak => {
                in_parens = false;
                outside.label = None;
            }
            Token::OpenParen => {
                // A parenthesis directly wrapping a form is display markup,
                // not an annotation scope.
                let wraps_form = matches!(stream.get(i + 1), Some(Token::Form { .. }));
                if !wraps_form {
                    in_parens = true;
                    inside = ScopeState::default();
                }
            }
            Token::CloseParen => {
                in_parens = false;
            }
            Token::Grammar(text) => {
                let scope = if in_parens { &mut inside } else { &mut outside };
                scope.grammar = Some(text.clone());
            }
            Token::Text(text) => {
                if !tokens::is_ignorable(text) {
                    let scope = if in_parens { &mut inside } else { &mut outside };
                    scope.grammar = Some(text.clone());
                }
            }
            Token::Label(text) => {
                let scope = if in_parens { &mut inside } else { &mut outside };
                scope.label = Some(text.clone());
            }
            Token::NewStart => {
                // Legacy documents occasionally restart the forms list; only
                // the forms after the restart count.
                forms.clear();
                outside = ScopeState::default();
                inside = ScopeState::default();
                in_parens = false;
            }
            Token::Form { text, id } => {
                let active = if in_parens { &inside } else { &outside };
                let date = active
                    .date_range
                    .clone()
                    .or_else(|| outside.date_range.clone());
                let grammar = active.grammar.clone().or_else(|| outside.grammar.clone());
                let label = active.label.clone().or_else(|| outside.label.clone());

                let mut form = VariantForm::new(text, date.unwrap_or_default());
                form.grammatical_information = grammar;
                form.label = label;
                form.structural_id = id.clone();
                form.infer_marks();
                forms.push(form);
            }
        }
        prev_was_label = matches!(token, Token::Label(_));
    }

    unpack::unpack_parentheticals(forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use varhist_types::daterange::UNKNOWN;

    fn form(text: &str) -> Token {
        Token::Form {
            text: text.to_string(),
            id: None,
        }
    }

    #[test]
    fn soft_break_clears_outside_label_but_keeps_date() {
        let forms = parse_tokens(&[
            Token::Date("17".to_string()),
            Token::Label("Sc.".to_string()),
            form("burnie"),
            Token::SoftBreak,
            form("birnie"),
        ]);
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].form, "burnie");
        assert_eq!((forms[0].date.start(), forms[0].date.end()), (1600, 1699));
        assert_eq!(forms[0].label.as_deref(), Some("Sc."));
        assert_eq!((forms[1].date.start(), forms[1].date.end()), (1600, 1699));
        assert_eq!(forms[1].label, None);
    }

    #[test]
    fn hard_break_clears_all_state() {
        let forms = parse_tokens(&[
            Token::Date("15".to_string()),
            Token::Grammar("plural".to_string()),
            form("wulfes"),
            Token::HardBreak,
            form("wolf"),
        ]);
        assert_eq!((forms[1].date.start(), forms[1].date.end()), (UNKNOWN, UNKNOWN));
        assert!(forms[1].undated);
        assert_eq!(forms[1].grammatical_information, None);
    }

    #[test]
    fn date_resets_label_unless_preceded_by_one() {
        let forms = parse_tokens(&[
            Token::Label("north.".to_string()),
            Token::Date("16".to_string()),
            form("wowf"),
            Token::Date("17".to_string()),
            form("wouf"),
        ]);
        assert_eq!(forms[0].label.as_deref(), Some("north."));
        assert_eq!(forms[1].label, None, "date without label resets the label");
    }

    #[test]
    fn parenthesized_annotations_shadow_outside_state() {
        let forms = parse_tokens(&[
            Token::Date("15".to_string()),
            form("wulf"),
            Token::OpenParen,
            Token::Date("17".to_string()),
            form("wolfe"),
            Token::CloseParen,
            form("wolf"),
        ]);
        assert_eq!((forms[0].date.start(), forms[0].date.end()), (1400, 1499));
        assert_eq!((forms[1].date.start(), forms[1].date.end()), (1600, 1699));
        // Back outside, the inner date no longer applies.
        assert_eq!((forms[2].date.start(), forms[2].date.end()), (1400, 1499));
    }

    #[test]
    fn inside_scope_falls_back_to_outside_state() {
        let forms = parse_tokens(&[
            Token::Date("15".to_string()),
            form("seed"),
            Token::OpenParen,
            Token::Grammar("plural".to_string()),
            form("wulfes"),
            Token::CloseParen,
        ]);
        // No inside date was set, so the outside date governs.
        assert_eq!((forms[1].date.start(), forms[1].date.end()), (1400, 1499));
        assert_eq!(forms[1].grammatical_information.as_deref(), Some("plural"));
    }

    #[test]
    fn paren_wrapping_a_form_does_not_open_a_scope() {
        let forms = parse_tokens(&[
            Token::Grammar("plural".to_string()),
            Token::OpenParen,
            form("wulfes"),
            Token::CloseParen,
        ]);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].grammatical_information.as_deref(), Some("plural"));
    }

    #[test]
    fn new_start_discards_collected_forms() {
        let forms = parse_tokens(&[
            form("stale"),
            Token::NewStart,
            Token::Date("16".to_string()),
            form("fresh"),
        ]);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form, "fresh");
        assert_eq!(forms[0].date.start(), 1500);
    }

    #[test]
    fn ignorable_text_does_not_become_grammar() {
        let forms = parse_tokens(&[
            Token::Text("also".to_string()),
            form("wolf"),
        ]);
        assert_eq!(forms[0].grammatical_information, None);
    }

    #[test]
    fn plain_text_becomes_grammar() {
        let forms = parse_tokens(&[
            Token::Text("past tense".to_string()),
            form("wolde"),
        ]);
        assert_eq!(
            forms[0].grammatical_information.as_deref(),
            Some("past tense")
        );
    }
}
