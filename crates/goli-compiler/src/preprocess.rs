//! preprocess.rs — Préprocesseur : littéraux protégés, commentaires `;`.
//!
//! Trois passes, dans cet ordre :
//!   1. `preserve` : chaque littéral (`"…"`, `'…'`, `` `…` ``) est remplacé par
//!      un placeholder opaque (UUID v4) ; la table placeholder → texte est rendue.
//!   2. `strip_comments` : ligne par ligne, tout ce qui suit le premier `;`
//!      non échappé disparaît (le saut de ligne reste).
//!   3. `restore` : chaque placeholder redevient son littéral d’origine.
//!
//! Un `;` à l’intérieur d’un littéral n’est donc jamais vu par la passe 2.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use log::{debug, warn};
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::error::Result;

/// Littéraux `"…"`, `'…'` et `` `…` `` : échappes (y compris du délimiteur et du
/// saut de ligne) et sauts de ligne bruts autorisés dans le corps.
pub const LITERAL_PATTERN: &str = concat!(
    r#""[^"\\]*(?:\\(?:.|\n)[^"\\]*)*""#,
    "|",
    r#"'[^'\\]*(?:\\(?:.|\n)[^'\\]*)*'"#,
    "|",
    r"`[^`\\]*(?:\\(?:.|\n)[^`\\]*)*`",
);

/// Forme d’un placeholder : UUID v4 en minuscules, avec tirets.
pub const PLACEHOLDER_PATTERN: &str =
    r"[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}";

/// Marqueur de commentaire (jusqu’à la fin de ligne).
pub const COMMENT_MARKER: u8 = b';';

/* ───────────────────────────── Quote map ───────────────────────────── */

/// Table placeholder → littéral d’origine. Une entrée par occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteMap {
    entries: HashMap<String, String>,
}

impl QuoteMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.entries.contains_key(placeholder)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, placeholder: String, literal: String) {
        self.entries.insert(placeholder, literal);
    }
}

/// Texte dont les littéraux sont encore des placeholders et les commentaires
/// déjà retirés.
#[derive(Debug, Clone)]
pub struct Protected {
    pub text: String,
    pub quotes: QuoteMap,
}

impl Protected {
    /// Littéraux dont le placeholder a disparu avec un commentaire. Typiquement
    /// une apostrophe dans un commentaire (`; don't`) qui a ouvert un littéral
    /// `'…'` courant jusqu’au `'` suivant : le code entre les deux est perdu.
    pub fn swallowed(&self) -> Vec<&str> {
        let mut lost: Vec<&str> = self
            .quotes
            .iter()
            .filter(|(key, _)| !self.text.contains(key))
            .map(|(_, literal)| literal)
            .collect();
        lost.sort_unstable();
        lost
    }
}

/* ───────────────────────────── Préprocesseur ───────────────────────────── */

/// Motifs compilés une fois, réutilisables pour autant d’entrées que voulu.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    literal: Regex,
    placeholder: Regex,
}

impl Preprocessor {
    pub fn new() -> Result<Self> {
        Self::with_literal_pattern(LITERAL_PATTERN)
    }

    /// Règle de littéral personnalisée ; un motif invalide est fatal
    /// (`Error::MalformedLiteralPattern`) avant tout traitement.
    pub fn with_literal_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            literal: Regex::new(pattern)?,
            placeholder: Regex::new(PLACEHOLDER_PATTERN)?,
        })
    }

    /// Remplace chaque littéral par un placeholder neuf, absent du texte d’entrée.
    pub fn preserve(&self, text: &str) -> (QuoteMap, String) {
        let mut quotes = QuoteMap::default();
        let out = self
            .literal
            .replace_all(text, |caps: &Captures<'_>| {
                let placeholder = fresh_placeholder(text, &quotes);
                quotes.insert(placeholder.clone(), caps[0].to_owned());
                placeholder
            })
            .into_owned();
        debug!("preserve: {} littéral(aux) protégé(s)", quotes.len());
        (quotes, out)
    }

    /// Remet chaque placeholder connu à la place de son littéral. Un texte qui a
    /// la forme d’un placeholder mais n’est pas dans la table reste tel quel.
    pub fn restore(&self, text: &str, quotes: &QuoteMap) -> String {
        if quotes.is_empty() {
            return text.to_owned();
        }
        self.placeholder
            .replace_all(text, |caps: &Captures<'_>| {
                let key = &caps[0];
                quotes.get(key).unwrap_or(key).to_owned()
            })
            .into_owned()
    }

    /// `preserve` puis `strip_comments` ; la table accompagne le texte.
    pub fn protect(&self, text: &str) -> Protected {
        let (quotes, preserved) = self.preserve(text);
        let protected = Protected {
            text: strip_comments(&preserved),
            quotes,
        };
        for literal in protected.swallowed() {
            warn!("littéral avalé par un commentaire, code ignoré : {literal:?}");
        }
        protected
    }

    /// Passe complète : littéraux protégés, commentaires retirés, littéraux remis.
    pub fn prepare(&self, text: &str) -> String {
        let Protected { text, quotes } = self.protect(text);
        self.restore(&text, &quotes)
    }
}

fn fresh_placeholder(input: &str, taken: &QuoteMap) -> String {
    loop {
        let candidate = Uuid::new_v4().hyphenated().to_string();
        if !input.contains(&candidate) && !taken.contains(&candidate) {
            return candidate;
        }
    }
}

/* ───────────────────────────── Commentaires ───────────────────────────── */

/// Coupe chaque ligne au premier `;` non précédé d’un `\`. La fin de ligne
/// (`\n` ou `\r\n`) est conservée ; une ligne sans marqueur est recopiée telle quelle.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        match comment_start(line) {
            Some(at) => {
                out.push_str(&line[..at]);
                out.push_str(line_ending(line));
            }
            None => out.push_str(line),
        }
    }
    out
}

fn comment_start(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'\\' if !escaped => escaped = true,
            COMMENT_MARKER if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/* ───────────────────────────── Tests ───────────────────────────── */
