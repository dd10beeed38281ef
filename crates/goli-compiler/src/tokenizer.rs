//! tokenizer.rs — Découpage en jetons.
//!
//! Volontairement naïf : un espace est inséré autour de chaque `(` et `)`,
//! puis le texte est coupé sur chaque caractère blanc. Les jetons vides
//! (séparateurs consécutifs) restent dans le flux ; c’est au constructeur
//! d’AST de les ignorer.

#![forbid(unsafe_code)]

pub const OPEN: &str = "(";
pub const CLOSE: &str = ")";

/// Jeton classé : marqueur de structure ou texte libre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Open,
    Close,
    /// Vide ou uniquement des blancs.
    Blank,
    /// Identifiant, littéral, placeholder, `nom:type`, `pkg/Fn`…
    Text(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(raw: &'a str) -> Self {
        match raw {
            OPEN => Self::Open,
            CLOSE => Self::Close,
            _ if raw.trim().is_empty() => Self::Blank,
            _ => Self::Text(raw),
        }
    }
}

pub fn tokenize(text: &str) -> Vec<String> {
    let spaced = text.replace('(', " ( ").replace(')', " ) ");
    spaced
        .trim()
        .split(char::is_whitespace)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn non_blank(text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| Token::classify(t) != Token::Blank)
            .collect()
    }

    #[test]
    fn splits_parens_and_atoms() {
        assert_eq!(
            non_blank("(defn greet:string (name:string) (fmt/Println name))"),
            vec![
                "(", "defn", "greet:string", "(", "name:string", ")", "(", "fmt/Println",
                "name", ")", ")"
            ]
        );
    }

    #[test]
    fn keeps_empty_tokens_for_the_builder() {
        let toks = tokenize("(a)(b)");
        assert!(toks.iter().any(String::is_empty));
    }

    #[test]
    fn newlines_and_tabs_separate_atoms() {
        assert_eq!(non_blank("(foo a\n\tb)"), vec!["(", "foo", "a", "b", ")"]);
    }

    #[test]
    fn classify_markers() {
        assert_eq!(Token::classify("("), Token::Open);
        assert_eq!(Token::classify(")"), Token::Close);
        assert_eq!(Token::classify(""), Token::Blank);
        assert_eq!(Token::classify("x:int"), Token::Text("x:int"));
    }
}
