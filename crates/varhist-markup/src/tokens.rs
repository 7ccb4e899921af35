//! Flattening of unrevised-dialect markup into a typed token stream.
//!
//! The unrevised grammar has no reliable nesting: annotations apply to
//! whatever follows them until something resets the state. The tokenizer
//! therefore flattens the tree into document order and re-tokenizes untagged
//! trailing text by splitting on recognized separators, so the state machine
//! in [`crate::unrevised`] only ever sees typed tokens.

use crate::dates;
use crate::node::{Node, Tag};

/// Filler phrases that carry no grammatical information.
const IGNORABLE: &[&str] = &[
    "also",
    "and",
    "or",
    "etc",
    "see below",
    "in later use",
    "freq",
];

/// One typed token of the unrevised forms grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Form { text: String, id: Option<String> },
    Date(String),
    Grammar(String),
    Label(String),
    /// Paragraph boundary: clears all parser state.
    HardBreak,
    /// Semicolon or colon: forces scope back outside parentheses.
    SoftBreak,
    OpenParen,
    CloseParen,
    /// "Forms" marker restarting the list mid-document.
    NewStart,
    Text(String),
}

/// True for filler the state machine must not treat as grammar text.
pub fn is_ignorable(text: &str) -> bool {
    let text = text.trim().trim_end_matches('.').to_lowercase();
    text.is_empty() || IGNORABLE.iter().any(|kw| text == *kw)
}

/// Flatten a pre-parsed unrevised subtree into tokens in document order.
pub fn tokenize(nodes: &[Node]) -> Vec<Token> {
    let mut out = Vec::new();
    for node in nodes {
        tokenize_node(node, &mut out);
    }
    out
}

fn tokenize_node(node: &Node, out: &mut Vec<Token>) {
    match node.tag {
        Tag::Form => out.push(Token::Form {
            text: node.text.trim().to_string(),
            id: node.id.clone(),
        }),
        Tag::Date => out.push(Token::Date(node.text.trim().to_string())),
        Tag::Grammar => out.push(Token::Grammar(node.text.trim().to_string())),
        Tag::Label => out.push(Token::Label(node.text.trim().to_string())),
        Tag::FormsStart => out.push(Token::NewStart),
        Tag::Para => {
            out.push(Token::HardBreak);
            for child in &node.children {
                tokenize_node(child, out);
            }
        }
        Tag::Section | Tag::Unit | Tag::Header => {
            for child in &node.children {
                tokenize_node(child, out);
            }
        }
        Tag::Text => retokenize_text(&node.text, out),
    }
    // Untagged trailing text gets the same treatment as a Text node.
    retokenize_text(&node.tail, out);
}

/// Split free text on recognized separators into the token vocabulary.
///
/// Parentheses and soft-break punctuation become their own tokens; the
/// remaining chunks are recognized as date codes where possible, dropped when
/// they are pure filler, and passed through as literal text otherwise.
pub fn retokenize_text(text: &str, out: &mut Vec<Token>) {
    let mut chunk = String::new();
    for c in text.chars() {
        match c {
            '(' => {
                flush_chunk(&mut chunk, out);
                out.push(Token::OpenParen);
            }
            ')' => {
                flush_chunk(&mut chunk, out);
                out.push(Token::CloseParen);
            }
            ';' | ':' => {
                flush_chunk(&mut chunk, out);
                out.push(Token::SoftBreak);
            }
            ',' => flush_chunk(&mut chunk, out),
            _ => chunk.push(c),
        }
    }
    flush_chunk(&mut chunk, out);
}

fn flush_chunk(chunk: &mut String, out: &mut Vec<Token>) {
    let text = std::mem::take(chunk);
    let mut words: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if is_ignorable(word) {
            continue;
        }
        words.push(word);
    }
    if words.is_empty() {
        return;
    }
    let joined = words.join(" ");
    let code = joined.trim_end_matches('.');
    if dates::parse_date_code(code).is_some() {
        out.push(Token::Date(code.to_string()));
    } else {
        out.push(Token::Text(joined));
    }
}
