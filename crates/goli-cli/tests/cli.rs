//! tests/cli.rs — sous-commandes de bout en bout, sorties capturées.

use std::fs;
use std::path::Path;

use goli_cli::run_from;
use pretty_assertions::assert_eq;

fn run(args: &[&str]) -> color_eyre::Result<String> {
    let mut out = Vec::new();
    let mut argv = vec!["goli"];
    argv.extend_from_slice(args);
    run_from(argv, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn write(dir: &Path, name: &str, src: &str) -> String {
    let p = dir.join(name);
    fs::write(&p, src).unwrap();
    p.to_str().unwrap().to_owned()
}

#[test]
fn build_prints_go_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "main.goli", "(package main)\n(defn main () (fmt/Println \"hi\"))\n");
    let out = run(&["build", &input]).unwrap();
    assert_eq!(out, "package main\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n");
}

#[test]
fn build_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "main.goli", "(package main)");
    let dst = dir.path().join("gen").join("main.go");
    let out = run(&["build", &input, "-o", dst.to_str().unwrap()]).unwrap();
    assert!(out.is_empty());
    assert_eq!(fs::read_to_string(&dst).unwrap(), "package main\n");
}

#[test]
fn build_many_writes_one_go_file_each() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.goli", "(package a)");
    let b = write(dir.path(), "b.goli", "(package b)");
    let outdir = dir.path().join("out");
    let log = run(&["build", &a, &b, "-o", outdir.to_str().unwrap()]).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert_eq!(fs::read_to_string(outdir.join("a.go")).unwrap(), "package a\n");
    assert_eq!(fs::read_to_string(outdir.join("b.go")).unwrap(), "package b\n");
}

#[test]
fn build_many_rejects_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.goli", "(package a)");
    assert!(run(&["build", &a, "-"]).is_err());
}

#[test]
fn config_next_to_input_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "goli.toml", "indent = \"  \"\n[aliases]\nfn = \"defn\"\n");
    let input = write(dir.path(), "main.goli", "(fn run () (os/Exit 1))");
    let out = run(&["build", &input]).unwrap();
    assert_eq!(out, "func run() {\n  os.Exit(1)\n}\n");
}

#[test]
fn explicit_config_flag() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "custom.toml", "header = \"// gen\"\n");
    let input = write(dir.path(), "main.goli", "(package main)");
    let out = run(&["--config", &cfg, "build", &input]).unwrap();
    assert_eq!(out, "// gen\n\npackage main\n");
}

#[test]
fn unknown_config_key_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "bad.toml", "tabs = true\n");
    let input = write(dir.path(), "main.goli", "(package main)");
    assert!(run(&["--config", &cfg, "build", &input]).is_err());
}

#[test]
fn ast_dumps_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "main.goli", "(package main) (f (g x))");
    let out = run(&["ast", &input, "--compact"]).unwrap();
    assert_eq!(out, "[[\"package\",\"main\"],[\"f\",[\"g\",\"x\"]]]\n");

    let pretty = run(&["ast", &input]).unwrap();
    let v: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(v, serde_json::json!([["package", "main"], ["f", ["g", "x"]]]));
}

#[test]
fn tokens_one_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "main.goli", "; note\n(f \"a b\")");
    let out = run(&["tokens", &input]).unwrap();
    assert_eq!(out, "(\nf\n\"a b\"\n)\n");
}

#[test]
fn unbalanced_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "bad.goli", "(foo))");
    let err = run(&["build", &input]).unwrap_err();
    assert!(err.to_string().contains("bad.goli"));
    // la cause d’origine reste dans la chaîne, sous le contexte
    assert!(err.chain().any(|cause| cause.to_string().contains("déséquilibrées")));
    assert!(matches!(
        err.root_cause().downcast_ref::<goli_compiler::Error>(),
        Some(goli_compiler::Error::UnbalancedParentheses { .. })
    ));
}

#[test]
fn missing_input_fails() {
    assert!(run(&["build", "/nonexistent/none.goli"]).is_err());
}

#[test]
fn deeply_nested_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let n = 10_000;
    let input = write(dir.path(), "deep.goli", &format!("{}x{}", "(".repeat(n), ")".repeat(n)));
    assert!(run(&["ast", &input]).is_err());
    assert!(run(&["build", &input]).is_err());
}
