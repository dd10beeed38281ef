//! codegen.rs — Génération de Go par parcours de l’arbre.
//!
//! Pour chaque liste :
//!   - tête atomique enregistrée → émetteur de la forme (`package`, `import`, `defn`) ;
//!   - tête atomique inconnue → appel `a.b(x, y)` (les `/` du chemin deviennent `.`) ;
//!   - tête qui est elle-même une liste → chaque enfant est généré, dans l’ordre ;
//!   - liste vide → ignorée (log `debug`).
//!
//! Les arguments d’une forme sont les enfants restants de *sa* liste, jamais
//! ceux d’un nœud voisin. La sortie est une simple concaténation : l’arbre
//! n’est jamais réécrit.
//!
//! Mise en page : formes de plus haut niveau séparées par une ligne vide,
//! corps et spécifications indentés par `Config::indent`. La première ligne
//! d’un fragment est indentée par l’appelant, les lignes de structure
//! (`)`, `}`, instructions du corps) par l’émetteur ; le contenu des
//! littéraux n’est jamais touché.

#![forbid(unsafe_code)]

use log::{debug, trace};

use crate::ast::{Ast, Child, NodeId};
use crate::config::Config;
use crate::error::{Error, FormPath, GenerateErrorKind, Result};
use crate::forms::{FnDef, Form, FormRegistry};

fn fail(path: &FormPath, kind: GenerateErrorKind) -> Error {
    Error::Generate {
        path: path.clone(),
        kind,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Generator<'r> {
    registry: &'r FormRegistry,
    config: &'r Config,
}

impl<'r> Generator<'r> {
    pub const fn new(registry: &'r FormRegistry, config: &'r Config) -> Self {
        Self { registry, config }
    }

    /// Génère le programme entier (racine de l’arbre).
    pub fn generate(&self, ast: &Ast) -> Result<String> {
        let mut items = Vec::new();
        let mut path = FormPath::default();
        self.node(ast, Ast::ROOT, 0, &mut path, &mut items)?;

        let mut out = String::new();
        if let Some(header) = &self.config.header {
            out.push_str(header);
            out.push_str("\n\n");
        }
        out.push_str(&items.join("\n\n"));
        if !items.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }

    fn pad(&self, depth: usize) -> String {
        self.config.indent.repeat(depth)
    }

    /// Fragments émis par le nœud `id`, ajoutés à `out` dans l’ordre.
    fn node(
        &self,
        ast: &Ast,
        id: NodeId,
        depth: usize,
        path: &mut FormPath,
        out: &mut Vec<String>,
    ) -> Result<()> {
        match ast.children(id) {
            [] => {
                if id != Ast::ROOT {
                    debug!("liste vide ignorée [{path}]");
                }
            }
            [Child::Atom(head), args @ ..] => {
                path.push(head);
                let fragment = self.form(ast, head, args, depth, path);
                path.pop();
                out.push(fragment?);
            }
            children => self.block(ast, children, depth, path, out)?,
        }
        Ok(())
    }

    fn block(
        &self,
        ast: &Ast,
        children: &[Child],
        depth: usize,
        path: &mut FormPath,
        out: &mut Vec<String>,
    ) -> Result<()> {
        for child in children {
            match child {
                Child::List(sub) => self.node(ast, *sub, depth, path, out)?,
                Child::Atom(a) => out.push(a.clone()),
            }
        }
        Ok(())
    }

    fn form(
        &self,
        ast: &Ast,
        head: &str,
        args: &[Child],
        depth: usize,
        path: &mut FormPath,
    ) -> Result<String> {
        let form = Form::resolve(self.registry, ast, head, args).map_err(|k| fail(path, k))?;
        trace!("forme `{head}` [{path}]");
        match form {
            Form::Package { name } => Ok(format!("package {name}")),
            Form::Import { specs } => Ok(self.import(&specs, depth)),
            Form::Defn(def) => self.function(ast, &def, depth, path),
            Form::Call { path: callee, args } => self.call(ast, callee, args, path),
        }
    }

    fn import(&self, specs: &[Vec<&str>], depth: usize) -> String {
        let inner = self.pad(depth + 1);
        let mut s = String::from("import (\n");
        for spec in specs {
            s.push_str(&inner);
            s.push_str(&spec.join(" "));
            s.push('\n');
        }
        s.push_str(&self.pad(depth));
        s.push(')');
        s
    }

    fn function(
        &self,
        ast: &Ast,
        def: &FnDef<'_>,
        depth: usize,
        path: &mut FormPath,
    ) -> Result<String> {
        let params = def
            .params
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = def.ret.map(|r| format!(" {r}")).unwrap_or_default();

        let mut body = Vec::new();
        self.block(ast, def.body, depth + 1, path, &mut body)?;

        let inner = self.pad(depth + 1);
        let mut s = format!("func {}({params}){ret} {{\n", def.name);
        for stmt in &body {
            s.push_str(&inner);
            s.push_str(stmt);
            s.push('\n');
        }
        s.push_str(&self.pad(depth));
        s.push('}');
        Ok(s)
    }

    /// Appel `a.b(x, y)`. Les arguments listes sont rendus comme appels imbriqués.
    fn call(
        &self,
        ast: &Ast,
        callee: &str,
        args: &[Child],
        path: &mut FormPath,
    ) -> Result<String> {
        let args = args
            .iter()
            .map(|arg| match arg {
                Child::Atom(a) => Ok(a.clone()),
                Child::List(id) => self.expression(ast, *id, path),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("{}({})", callee.replace('/', "."), args.join(", ")))
    }

    fn expression(&self, ast: &Ast, id: NodeId, path: &mut FormPath) -> Result<String> {
        match ast.children(id) {
            [] => Err(fail(path, GenerateErrorKind::EmptyExpression)),
            [Child::Atom(head), args @ ..] => {
                path.push(head);
                let res = if self.registry.lookup(head).is_some() {
                    Err(fail(
                        path,
                        GenerateErrorKind::FormInExpression { form: head.clone() },
                    ))
                } else {
                    self.call(ast, head, args, path)
                };
                path.pop();
                res
            }
            [Child::List(_), ..] => Err(fail(
                path,
                GenerateErrorKind::ExpectedAtom {
                    form: path.segments().last().cloned().unwrap_or_default(),
                },
            )),
        }
    }
}
