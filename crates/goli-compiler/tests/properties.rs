//! tests/properties.rs — propriétés du préprocesseur, du lexer et de l’AST.

use goli_compiler::ast::build;
use goli_compiler::preprocess::{strip_comments, Preprocessor};
use goli_compiler::tokenizer::tokenize;
use goli_compiler::{transpile, Error};
use proptest::prelude::*;

/// Arbre aléatoire : atome (identifiant) ou liste d’arbres.
#[derive(Debug, Clone)]
enum Tree {
    Atom(String),
    List(Vec<Tree>),
}

impl Tree {
    fn render(&self, out: &mut String) {
        match self {
            Self::Atom(a) => {
                out.push_str(a);
                out.push(' ');
            }
            Self::List(items) => {
                out.push('(');
                for t in items {
                    t.render(out);
                }
                out.push_str(") ");
            }
        }
    }
}

fn tree() -> impl Strategy<Value = Tree> {
    let leaf = "[a-z][a-z0-9:/]{0,6}".prop_map(Tree::Atom);
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop::collection::vec(inner, 0..5).prop_map(Tree::List)
    })
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(tree(), 0..5).prop_map(|trees| {
        let mut s = String::new();
        for t in &trees {
            t.render(&mut s);
        }
        s
    })
}

proptest! {
    #[test]
    fn restore_inverts_preserve(
        body in "[a-z ;()\n]{0,24}",
        atom in "[a-z]{1,8}",
    ) {
        let pre = Preprocessor::new().unwrap();
        let src = format!("({atom} \"{body}\" '{body}' `{body}`)");
        prop_assert_eq!(pre.prepare(&src), src);
    }

    #[test]
    fn marker_inside_literal_never_truncates(
        lit in "[a-z ;]{0,16}",
        comment in "[a-z ;]{0,16}",
    ) {
        let pre = Preprocessor::new().unwrap();
        let src = format!("(f \"{lit}\") ;{comment}\n(g)");
        prop_assert_eq!(pre.prepare(&src), format!("(f \"{lit}\") \n(g)"));
    }

    #[test]
    fn marker_outside_literal_truncates(line in "[a-z ()]{0,16}", rest in "[a-z ;]{0,16}") {
        prop_assert_eq!(strip_comments(&format!("{line};{rest}")), line);
    }

    #[test]
    fn flatten_reproduces_token_stream(src in program()) {
        let tokens = tokenize(&src);
        let ast = build(&tokens).unwrap();
        let expected: Vec<String> = tokens.into_iter().filter(|t| !t.is_empty()).collect();
        prop_assert_eq!(ast.flatten(), expected);
    }

    #[test]
    fn excess_close_is_always_rejected(parens in prop::collection::vec(any::<bool>(), 1..24)) {
        let tokens: Vec<&str> = parens.iter().map(|&open| if open { "(" } else { ")" }).collect();
        let mut depth = 0i32;
        let mut underflow = false;
        for &open in &parens {
            depth += if open { 1 } else { -1 };
            if depth < 0 {
                underflow = true;
                break;
            }
        }
        let res = build(&tokens);
        if underflow {
            prop_assert!(matches!(res, Err(Error::UnbalancedParentheses { .. })), "attendu UnbalancedParentheses");
        } else if depth > 0 {
            prop_assert!(matches!(res, Err(Error::UnclosedParentheses { .. })), "attendu UnclosedParentheses");
        } else {
            prop_assert!(res.is_ok());
        }
    }

    #[test]
    fn unregistered_head_becomes_a_call(
        head in "[a-z]{1,6}(/[A-Z][a-z]{0,6}){0,2}",
        args in prop::collection::vec("[a-z0-9]{1,4}", 0..4),
    ) {
        prop_assume!(!["package", "import", "defn"].contains(&head.as_str()));
        let src = format!("({head} {})", args.join(" "));
        let out = transpile(&src).unwrap();
        prop_assert_eq!(out, format!("{}({})\n", head.replace('/', "."), args.join(", ")));
    }
}
