//! Decomposition of compound headwords into ordered components.

/// Separator preceding a component within a compound lemma.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connector {
    /// First component; nothing precedes it.
    None,
    Space,
    Hyphen,
}

impl Connector {
    /// The literal separator text, empty for the leading component.
    pub fn text(self) -> &'static str {
        match self {
            Connector::None => "",
            Connector::Space => " ",
            Connector::Hyphen => "-",
        }
    }
}

/// One component of a compound lemma, with the separator that precedes it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Component {
    pub text: String,
    pub connector: Connector,
}

/// A headword split on spaces and internal hyphens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompoundLemma {
    pub components: Vec<Component>,
}

impl CompoundLemma {
    /// Split `lemma` into components. Edge hyphens mark an affix fragment and
    /// are not split points; a solid word yields a single component.
    pub fn split(lemma: &str) -> Self {
        let lemma = lemma.trim();
        let mut components = Vec::new();
        let mut current = String::new();
        let mut pending = Connector::None;
        let chars: Vec<char> = lemma.chars().collect();

        for (i, &c) in chars.iter().enumerate() {
            let edge = i == 0 || i == chars.len() - 1;
            let split_on = match c {
                ' ' => Some(Connector::Space),
                '-' if !edge => Some(Connector::Hyphen),
                _ => None,
            };
            match split_on {
                Some(connector) if !current.is_empty() => {
                    components.push(Component {
                        text: std::mem::take(&mut current),
                        connector: pending,
                    });
                    pending = connector;
                }
                Some(_) => {}
                None => current.push(c),
            }
        }
        if !current.is_empty() {
            components.push(Component {
                text: current,
                connector: pending,
            });
        }
        CompoundLemma { components }
    }

    pub fn is_compound(&self) -> bool {
        self.components.len() >= 2
    }

    /// True for affix-fragment lemmas like `-ing` or `un-`.
    pub fn is_affix(lemma: &str) -> bool {
        let lemma = lemma.trim();
        lemma.starts_with('-') || lemma.ends_with('-')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_word_is_one_component() {
        let lemma = CompoundLemma::split("wellhead");
        assert_eq!(lemma.components.len(), 1);
        assert!(!lemma.is_compound());
    }

    #[test]
    fn hyphen_and_space_compounds_split_with_connectors() {
        let lemma = CompoundLemma::split("well-head");
        assert_eq!(lemma.components.len(), 2);
        assert_eq!(lemma.components[0].text, "well");
        assert_eq!(lemma.components[0].connector, Connector::None);
        assert_eq!(lemma.components[1].text, "head");
        assert_eq!(lemma.components[1].connector, Connector::Hyphen);

        let lemma = CompoundLemma::split("walking stick");
        assert_eq!(lemma.components[1].connector, Connector::Space);
    }

    #[test]
    fn affix_hyphens_do_not_split() {
        let lemma = CompoundLemma::split("-ynge");
        assert_eq!(lemma.components.len(), 1);
        assert!(CompoundLemma::is_affix("-ynge"));
        assert!(CompoundLemma::is_affix("un-"));
        assert!(!CompoundLemma::is_affix("well-head"));
    }
}
