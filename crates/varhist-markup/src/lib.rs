//! Legacy-markup parsing and the forms pipeline for one dictionary entry.
//!
//! Two source dialects record an entry's spelling variants. The revised
//! dialect nests reliably and gets a plain recursive parser
//! ([`revised::parse`]); the unrevised dialect has no reliable nesting and
//! gets a tokenizer plus an explicit finite-state machine
//! ([`unrevised::parse_tokens`]). Both produce the same output contract, a
//! list of [`varhist_types::VariantForm`].
//!
//! On top of the parsers sit the detruncation cascade ([`detrunc`]), which
//! expands affix fragments like `-ynge` against a known full form, and
//! [`FormsList`], the lazy memoized pipeline of filtered views
//! (base -> detruncated -> uniqued -> marked/unmarked -> per-inflection).
//!
//! ```rust
//! use varhist_markup::node::{Node, Tag};
//! use varhist_markup::FormsList;
//!
//! let root = Node::new(Tag::Section, "").with_children(vec![
//!     Node::new(Tag::Unit, "").with_children(vec![
//!         Node::new(Tag::Form, "wolf"),
//!         Node::new(Tag::Date, "16-"),
//!     ]),
//! ]);
//! let mut forms = FormsList::from_revised("wolf", &root);
//! assert_eq!(forms.base().len(), 1);
//! assert_eq!(forms.uniqued().len(), 1);
//! ```

pub mod dates;
pub mod detrunc;
pub mod formslist;
pub mod node;
pub mod revised;
pub mod tokens;
pub mod unpack;
pub mod unrevised;

pub use detrunc::{TruncationChecker, detruncate};
pub use formslist::{FormsList, Stage};
pub use node::{Node, Tag};
pub use tokens::Token;
