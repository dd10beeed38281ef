use std::fs;
use std::io::{self, Read};

use camino::Utf8Path;

/// Entrée spéciale : lire la source sur stdin.
pub const STDIN: &str = "-";

pub fn is_stdin(p: &Utf8Path) -> bool {
    p.as_str() == STDIN
}

pub fn ensure_parent(p: &Utf8Path) -> io::Result<()> {
    if let Some(dir) = p.parent().filter(|d| !d.as_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn read_source(p: &Utf8Path) -> io::Result<String> {
    if is_stdin(p) {
        let mut s = String::new();
        io::stdin().lock().read_to_string(&mut s)?;
        return Ok(s);
    }
    fs::read_to_string(p)
}

pub fn write_all(p: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent(p)?;
    fs::write(p, bytes)
}
