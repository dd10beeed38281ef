//! pipeline.rs — Orchestrateur : préprocesseur → lexer → AST → génération.
//!
//! Les jetons sont découpés sur le texte *protégé* (littéraux encore en
//! placeholders, commentaires retirés), puis chaque jeton est restauré : un
//! littéral contenant des blancs ou des parenthèses reste un seul atome.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::ast::{self, Ast};
use crate::codegen::Generator;
use crate::config::Config;
use crate::error::Result;
use crate::forms::FormRegistry;
use crate::preprocess::{Preprocessor, Protected};
use crate::tokenizer::tokenize;

/// Transpileur prêt à l’emploi : motifs compilés et registre construits une
/// fois, réutilisables (et partageables entre threads) pour autant de
/// programmes que voulu.
#[derive(Debug, Clone)]
pub struct Transpiler {
    config: Config,
    registry: FormRegistry,
    pre: Preprocessor,
}

impl Transpiler {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let registry = config.registry()?;
        let pre = Preprocessor::new()?;
        Ok(Self {
            config,
            registry,
            pre,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    /// Flux de jetons, littéraux restaurés.
    pub fn tokens(&self, source: &str) -> Vec<String> {
        let Protected { text, quotes } = self.pre.protect(source);
        let tokens: Vec<String> = tokenize(&text)
            .iter()
            .map(|t| self.pre.restore(t, &quotes))
            .collect();
        debug!(
            "tokenize: {} jeton(s) utile(s) sur {} bruts",
            tokens.iter().filter(|t| !t.is_empty()).count(),
            tokens.len()
        );
        tokens
    }

    pub fn parse(&self, source: &str) -> Result<Ast> {
        ast::build(&self.tokens(source))
    }

    pub fn transpile(&self, source: &str) -> Result<String> {
        let ast = self.parse(source)?;
        Generator::new(&self.registry, &self.config).generate(&ast)
    }

    pub fn transpile_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        info!("transpile {}", path.display());
        self.transpile(&source)
    }
}

/// Raccourci : config par défaut.
pub fn transpile(source: &str) -> Result<String> {
    Transpiler::new(Config::default())?.transpile(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t() -> Transpiler {
        Transpiler::new(Config::default()).unwrap()
    }

    #[test]
    fn literal_with_spaces_and_parens_is_one_atom() {
        let toks: Vec<String> = t()
            .tokens("(fmt/Println \"a (b) c\")")
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(toks, vec!["(", "fmt/Println", "\"a (b) c\"", ")"]);
    }

    #[test]
    fn multiline_literal_is_not_reindented() {
        let out = t().transpile("(defn f () (g `a\n  b`))").unwrap();
        assert_eq!(out, "func f() {\n\tg(`a\n  b`)\n}\n");
    }

    #[test]
    fn comments_produce_no_tokens() {
        let toks = t().tokens("; rien ici\n; (package x)\n");
        assert!(toks.iter().all(String::is_empty));
    }

    #[test]
    fn transpiler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Transpiler>();
    }

    #[test]
    fn transpile_file_reads_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.goli");
        std::fs::write(&path, "(package main)\n").unwrap();
        assert_eq!(t().transpile_file(&path).unwrap(), "package main\n");
    }
}
