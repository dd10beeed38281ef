//! error.rs — Erreurs du pipeline goli.
//!
//! Une famille par étape : préprocesseur (motif de littéral), construction de
//! l’AST (parenthèses), génération (formes mal construites), configuration.
//! Aucune étape ne continue après l’échec d’une étape précédente.

use std::fmt;

use thiserror::Error;

/// Chemin des têtes de formes, de la racine jusqu’au nœud fautif.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPath(pub Vec<String>);

impl FormPath {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub(crate) fn push(&mut self, head: &str) {
        self.0.push(head.to_owned());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<racine>");
        }
        f.write_str(&self.0.join(" > "))
    }
}

/// Cause locale d’un échec de génération.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateErrorKind {
    #[error("trop d’arguments pour `{form}` (attendu {expected}, reçu {found})")]
    TooManyArguments {
        form: String,
        expected: usize,
        found: usize,
    },

    #[error("argument manquant pour `{form}` : {what}")]
    MissingArgument { form: String, what: &'static str },

    #[error("jeton typé invalide `{token}` (attendu `nom:type`)")]
    MalformedTypedToken { token: String },

    #[error("`{form}` attend une liste pour {what}")]
    ExpectedList { form: String, what: &'static str },

    #[error("`{form}` attend un atome, trouvé une liste")]
    ExpectedAtom { form: String },

    #[error("spécification d’import vide dans `{form}`")]
    EmptySpec { form: String },

    #[error("la forme `{form}` n’est pas utilisable comme expression")]
    FormInExpression { form: String },

    #[error("liste vide en position d’expression")]
    EmptyExpression,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Le motif de reconnaissance des littéraux (ou des placeholders) ne compile pas.
    #[error("motif de littéral invalide : {0}")]
    MalformedLiteralPattern(#[from] regex::Error),

    /// `)` rencontrée à la racine.
    #[error("parenthèses déséquilibrées : `)` sans `(` correspondante (token #{token})")]
    UnbalancedParentheses { token: usize },

    /// Fin d’entrée avec des listes encore ouvertes.
    #[error("parenthèses déséquilibrées : {depth} liste(s) non fermée(s) en fin d’entrée")]
    UnclosedParentheses { depth: usize },

    /// Imbrication au-delà de `ast::MAX_DEPTH` (jeton `(` fautif).
    #[error("imbrication trop profonde : plus de {limit} listes (token #{token})")]
    NestingTooDeep { limit: usize, token: usize },

    #[error("génération [{path}] : {kind}")]
    Generate {
        path: FormPath,
        kind: GenerateErrorKind,
    },

    #[error("config : {0}")]
    Config(String),

    #[error("config TOML invalide : {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io : {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Cause de génération, si l’erreur vient du générateur.
    pub const fn generate_kind(&self) -> Option<&GenerateErrorKind> {
        match self {
            Self::Generate { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub const fn form_path(&self) -> Option<&FormPath> {
        match self {
            Self::Generate { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
