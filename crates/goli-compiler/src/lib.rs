//! goli-compiler — Frontend goli : s-expressions → Go.
//!
//! ## Pipeline
//! - `preprocess` : littéraux protégés par placeholders, commentaires `;` retirés.
//! - `tokenizer`  : espaces autour de `(`/`)`, découpe sur les blancs.
//! - `ast`        : arbre de listes en arène (parents par index).
//! - `forms`      : registre des têtes (`package`, `import`, `defn`, alias) et formes typées.
//! - `codegen`    : parcours de l’arbre, une variante de forme → un émetteur.
//! - `pipeline`   : `Transpiler`, qui enchaîne le tout.
//!
//! ```
//! let go = goli_compiler::transpile("(package main)").unwrap();
//! assert_eq!(go, "package main\n");
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod ast;
pub mod codegen;
pub mod config;
pub mod error;
pub mod forms;
pub mod pipeline;
pub mod preprocess;
pub mod tokenizer;

pub use ast::{Ast, Child, NodeId};
pub use config::Config;
pub use error::{Error, FormPath, GenerateErrorKind, Result};
pub use forms::{FormKind, FormRegistry};
pub use pipeline::{transpile, Transpiler};

/// Version du crate (lisible, via Cargo).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renvoie une jolie bannière de version (utile pour logs/outils).
pub fn version() -> String {
    format!("goli-compiler {VERSION}")
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_banner_names_the_crate() {
        assert_eq!(super::version(), format!("goli-compiler {}", super::VERSION));
        assert!(!super::VERSION.is_empty());
    }
}
