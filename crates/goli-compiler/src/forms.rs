//! forms.rs — Formes reconnues et registre des têtes de liste.
//!
//! Le registre associe un symbole de tête à un `FormKind`. Il est construit une
//! fois (builtins + alias de la config), puis seulement lu ; on peut le
//! partager entre plusieurs transpilations.
//!
//! `Form::resolve` transforme une liste (tête + arguments) en variante typée,
//! arguments déjà validés. Une tête inconnue donne `Form::Call`.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::{Ast, Child};
use crate::error::{Error, GenerateErrorKind, Result};

/* ───────────────────────────── Registre ───────────────────────────── */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Package,
    Import,
    Defn,
}

impl FormKind {
    pub const ALL: [Self; 3] = [Self::Package, Self::Import, Self::Defn];

    /// Symbole de tête par défaut.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Import => "import",
            Self::Defn => "defn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRegistry {
    by_head: HashMap<String, FormKind>,
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormRegistry {
    pub fn builtin() -> Self {
        Self {
            by_head: FormKind::ALL
                .iter()
                .map(|k| (k.name().to_owned(), *k))
                .collect(),
        }
    }

    /// Builtins + alias. Un alias ne peut pas masquer une tête déjà enregistrée.
    pub fn with_aliases<'a, I>(aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, FormKind)>,
    {
        let mut reg = Self::builtin();
        for (head, kind) in aliases {
            if head.is_empty() || head.contains(char::is_whitespace) || head.contains(['(', ')']) {
                return Err(Error::Config(format!("alias invalide : {head:?}")));
            }
            if let Some(existing) = reg.by_head.get(head) {
                return Err(Error::Config(format!(
                    "l’alias `{head}` masque la forme `{}`",
                    existing.name()
                )));
            }
            reg.by_head.insert(head.to_owned(), kind);
        }
        Ok(reg)
    }

    pub fn lookup(&self, head: &str) -> Option<FormKind> {
        self.by_head.get(head).copied()
    }

    pub fn len(&self) -> usize {
        self.by_head.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_head.is_empty()
    }
}

/* ───────────────────────────── Formes typées ───────────────────────────── */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'a> {
    pub name: &'a str,
    pub ty: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDef<'a> {
    pub name: &'a str,
    pub ret: Option<&'a str>,
    pub params: Vec<Param<'a>>,
    pub body: &'a [Child],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form<'a> {
    Package { name: &'a str },
    /// Une spécification par liste, atomes dans l’ordre.
    Import { specs: Vec<Vec<&'a str>> },
    Defn(FnDef<'a>),
    /// Tête inconnue : appel `chemin(args…)`.
    Call { path: &'a str, args: &'a [Child] },
}

pub type FormResult<T> = core::result::Result<T, GenerateErrorKind>;

impl<'a> Form<'a> {
    pub fn resolve(
        registry: &FormRegistry,
        ast: &'a Ast,
        head: &'a str,
        args: &'a [Child],
    ) -> FormResult<Self> {
        match registry.lookup(head) {
            Some(FormKind::Package) => package(head, args),
            Some(FormKind::Import) => import(ast, head, args),
            Some(FormKind::Defn) => defn(ast, head, args),
            None => Ok(Self::Call { path: head, args }),
        }
    }
}

fn atom<'a>(form: &str, child: &'a Child) -> FormResult<&'a str> {
    child.as_atom().ok_or_else(|| GenerateErrorKind::ExpectedAtom {
        form: form.to_owned(),
    })
}

fn package<'a>(head: &str, args: &'a [Child]) -> FormResult<Form<'a>> {
    match args {
        [] => Err(GenerateErrorKind::MissingArgument {
            form: head.to_owned(),
            what: "le nom du paquet",
        }),
        [name] => Ok(Form::Package {
            name: atom(head, name)?,
        }),
        _ => Err(GenerateErrorKind::TooManyArguments {
            form: head.to_owned(),
            expected: 1,
            found: args.len(),
        }),
    }
}

fn import<'a>(ast: &'a Ast, head: &str, args: &'a [Child]) -> FormResult<Form<'a>> {
    let mut specs = Vec::with_capacity(args.len());
    for arg in args {
        let id = arg.as_list().ok_or_else(|| GenerateErrorKind::ExpectedList {
            form: head.to_owned(),
            what: "chaque spécification",
        })?;
        let spec = ast
            .children(id)
            .iter()
            .map(|c| atom(head, c))
            .collect::<FormResult<Vec<_>>>()?;
        if spec.is_empty() {
            return Err(GenerateErrorKind::EmptySpec {
                form: head.to_owned(),
            });
        }
        specs.push(spec);
    }
    Ok(Form::Import { specs })
}

fn defn<'a>(ast: &'a Ast, head: &str, args: &'a [Child]) -> FormResult<Form<'a>> {
    let (signature, rest) = args
        .split_first()
        .ok_or_else(|| GenerateErrorKind::MissingArgument {
            form: head.to_owned(),
            what: "le nom de la fonction",
        })?;
    let (name, ret) = parse_name(atom(head, signature)?)?;

    let (params, body) = rest
        .split_first()
        .ok_or_else(|| GenerateErrorKind::MissingArgument {
            form: head.to_owned(),
            what: "la liste des paramètres",
        })?;
    let params = params.as_list().ok_or_else(|| GenerateErrorKind::ExpectedList {
        form: head.to_owned(),
        what: "les paramètres",
    })?;
    let params = ast
        .children(params)
        .iter()
        .map(|c| atom(head, c).and_then(parse_param))
        .collect::<FormResult<Vec<_>>>()?;

    Ok(Form::Defn(FnDef {
        name,
        ret,
        params,
        body,
    }))
}

/* ───────────────────────────── Jetons typés ───────────────────────────── */

fn malformed(token: &str) -> GenerateErrorKind {
    GenerateErrorKind::MalformedTypedToken {
        token: token.to_owned(),
    }
}

/// `nom` ou `nom:type` (type de retour facultatif). `nom:` et `a:b:c` sont refusés.
pub fn parse_name(token: &str) -> FormResult<(&str, Option<&str>)> {
    match token.split_once(':') {
        None => Ok((token, None)),
        Some((name, ty)) if !name.is_empty() && !ty.is_empty() && !ty.contains(':') => {
            Ok((name, Some(ty)))
        }
        Some(_) => Err(malformed(token)),
    }
}

/// `nom:type`, les deux parties obligatoires.
pub fn parse_param(token: &str) -> FormResult<Param<'_>> {
    match parse_name(token)? {
        (name, Some(ty)) => Ok(Param { name, ty }),
        (_, None) => Err(malformed(token)),
    }
}
