//! ast.rs — Arbre de listes parenthésées, stocké en arène.
//!
//! Chaque nœud vit dans une table plate et est désigné par son index
//! (`NodeId`). Le parent est un simple index : remonter d’un niveau est une
//! lecture de table, jamais une référence possédante.
//!
//! Construction : une seule passe, un curseur. `(` ouvre un enfant et y
//! descend, `)` remonte au parent, tout autre jeton non blanc devient un
//! atome du nœud courant. La chaîne des parents sert de pile.

#![forbid(unsafe_code)]

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tokenizer::{Token, CLOSE, OPEN};

/// Profondeur d’imbrication maximale acceptée par `build`. La génération et
/// la vue JSON parcourent l’arbre récursivement : la borne tient la pile.
pub const MAX_DEPTH: usize = 512;

/// Index d’un nœud dans l’arène.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Enfant d’une liste : atome textuel ou liste imbriquée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Atom(String),
    List(NodeId),
}

impl Child {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(a) => Some(a),
            Self::List(_) => None,
        }
    }

    pub const fn as_list(&self) -> Option<NodeId> {
        match self {
            Self::List(id) => Some(*id),
            Self::Atom(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    children: Vec<Child>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub const ROOT: NodeId = NodeId(0);

    /// Arbre réduit à une racine vide.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[Child] {
        self.node(id).children()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Nombre de nœuds, racine comprise.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Profondeur de `id` (0 pour la racine).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = id;
        while let Some(up) = self.parent(cur) {
            depth += 1;
            cur = up;
        }
        depth
    }

    fn open_child(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(Child::List(id));
        id
    }

    fn push_atom(&mut self, at: NodeId, text: &str) {
        self.nodes[at.0].children.push(Child::Atom(text.to_owned()));
    }

    /// Aplatissement en ordre : atomes dans l’ordre, `(`/`)` aux frontières des
    /// listes. Reproduit le flux de jetons non blancs d’une entrée équilibrée.
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(Self::ROOT, &mut out);
        out
    }

    fn flatten_into(&self, id: NodeId, out: &mut Vec<String>) {
        for child in self.children(id) {
            match child {
                Child::Atom(a) => out.push(a.clone()),
                Child::List(sub) => {
                    out.push(OPEN.to_owned());
                    self.flatten_into(*sub, out);
                    out.push(CLOSE.to_owned());
                }
            }
        }
    }

    /// Vue JSON : un atome est une chaîne, une liste un tableau. La racine est
    /// le tableau des formes de plus haut niveau.
    pub fn to_json(&self) -> Value {
        self.list_json(Self::ROOT)
    }

    fn list_json(&self, id: NodeId) -> Value {
        Value::Array(
            self.children(id)
                .iter()
                .map(|child| match child {
                    Child::Atom(a) => Value::String(a.clone()),
                    Child::List(sub) => self.list_json(*sub),
                })
                .collect(),
        )
    }
}

/// Construit l’arbre à partir du flux de jetons.
///
/// Une `)` à la racine donne `Error::UnbalancedParentheses` (index du jeton) ;
/// des listes encore ouvertes en fin de flux donnent `Error::UnclosedParentheses` ;
/// plus de `MAX_DEPTH` listes imbriquées donnent `Error::NestingTooDeep`.
pub fn build<S: AsRef<str>>(tokens: &[S]) -> Result<Ast> {
    let mut ast = Ast::new();
    let mut cursor = Ast::ROOT;
    let mut depth = 0usize;

    for (index, raw) in tokens.iter().enumerate() {
        match Token::classify(raw.as_ref()) {
            Token::Blank => {}
            Token::Open => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(Error::NestingTooDeep {
                        limit: MAX_DEPTH,
                        token: index,
                    });
                }
                cursor = ast.open_child(cursor);
            }
            Token::Close => {
                cursor = ast
                    .parent(cursor)
                    .ok_or(Error::UnbalancedParentheses { token: index })?;
                depth -= 1;
            }
            Token::Text(text) => ast.push_atom(cursor, text),
        }
    }

    if cursor != Ast::ROOT {
        return Err(Error::UnclosedParentheses { depth });
    }
    debug!("ast: {} nœud(s)", ast.node_count());
    Ok(ast)
}
