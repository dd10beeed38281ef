//! config.rs — Configuration de la génération.
//!
//! - Defaults sûrs (`Config::default()`)
//! - Lecture TOML (`goli.toml`) via `Config::from_toml_str` / `Config::load`
//! - Overrides ENV via `Config::apply_env` (préfixe `GOLI_`)
//!
//! ENV supportés (tous facultatifs) :
//!   GOLI_INDENT=tab|<n>|<texte>   (`tab` → "\t", `4` → 4 espaces)
//!   GOLI_HEADER=<ligne>           (ligne émise en tête de sortie)
//!
//! Exemple de `goli.toml` :
//! ```toml
//! indent = "    "
//! header = "// Code generated by goli. DO NOT EDIT."
//!
//! [aliases]
//! func = "defn"
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forms::{FormKind, FormRegistry};

/// Nom du fichier de config cherché à côté des sources.
pub const CONFIG_FILE: &str = "goli.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Unité d’indentation (corps de fonctions, spécifications d’import).
    pub indent: String,
    /// Ligne émise avant tout le reste (ex. `// Code generated … DO NOT EDIT.`).
    pub header: Option<String>,
    /// Têtes de liste supplémentaires → forme existante.
    pub aliases: BTreeMap<String, FormKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: "\t".to_owned(),
            header: None,
            aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)?;
        debug!("config: lecture de {}", path.display());
        Self::from_toml_str(&src)
    }

    /// Applique les variables `GOLI_*` de l’environnement du processus.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Comme `apply_env`, avec une source de variables injectable (tests).
    pub fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = get("GOLI_INDENT") {
            self.indent = parse_indent(&v);
        }
        if let Some(v) = get("GOLI_HEADER") {
            self.header = if v.is_empty() { None } else { Some(v) };
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(Error::Config(format!(
                "indent doit ne contenir que des espaces ou tabulations : {:?}",
                self.indent
            )));
        }
        if let Some(h) = &self.header {
            if h.contains('\n') {
                return Err(Error::Config("header doit tenir sur une ligne".into()));
            }
        }
        Ok(())
    }

    /// Registre des formes : builtins + alias de cette config.
    pub fn registry(&self) -> Result<FormRegistry> {
        FormRegistry::with_aliases(self.aliases.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

fn parse_indent(v: &str) -> String {
    match v {
        "tab" => "\t".to_owned(),
        _ => v
            .parse::<usize>()
            .map_or_else(|_| v.to_owned(), |n| " ".repeat(n)),
    }
}
