//! goli-cli/src/lib.rs — CLI lib pour goli
//!
//! Sous-commandes :
//!   - build  : transpile un ou plusieurs `.goli` en Go
//!   - ast    : dump JSON de l’arbre (atomes = chaînes, listes = tableaux)
//!   - tokens : flux de jetons, un par ligne
//!
//! Config : `--config <fichier>`, sinon `goli.toml` à côté de la première
//! entrée s’il existe, sinon les défauts ; puis les variables `GOLI_*`.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, ContextCompat, Result, WrapErr};
use log::{debug, info};

use goli_compiler::config::CONFIG_FILE;
use goli_compiler::{Config, Transpiler};

mod util;
use util::fs;

/// Point d’entrée du binaire (à appeler depuis src/main.rs)
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    execute(cli, &mut io::stdout().lock())
}

/// Comme `run`, avec des arguments et une sortie explicites.
pub fn run_from<I, T>(args: I, out: &mut dyn Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    execute(cli, out)
}

#[derive(Parser, Debug)]
#[command(name = "goli", version, about = "Transpileur goli : s-expressions → Go")]
struct Cli {
    /// Verbosité (répéter pour plus de bruit)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Fichier de config (défaut : goli.toml à côté de la première entrée)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Transpile un ou plusieurs fichiers .goli en Go
    Build {
        /// Fichiers source (`-` pour stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Fichier de sortie (une entrée) ou dossier de sortie (plusieurs entrées)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Affiche l’arbre en JSON
    Ast {
        input: PathBuf,
        /// JSON sur une ligne
        #[arg(long)]
        compact: bool,
    },
    /// Affiche les jetons, un par ligne
    Tokens { input: PathBuf },
}

fn execute(cli: Cli, out: &mut dyn Write) -> Result<()> {
    init_logging(cli.verbose);
    info!("{}", goli_compiler::version());
    let config = cli.config.map(utf8).transpose()?;

    match cli.cmd {
        Cmd::Build { inputs, output } => {
            let inputs = inputs.into_iter().map(utf8).collect::<Result<Vec<_>>>()?;
            let output = output.map(utf8).transpose()?;
            let first = inputs.first().context("aucune entrée")?;
            let t = transpiler(config.as_deref(), first)?;
            cmd_build(&t, &inputs, output.as_deref(), out)
        }
        Cmd::Ast { input, compact } => {
            let input = utf8(input)?;
            let t = transpiler(config.as_deref(), &input)?;
            cmd_ast(&t, &input, compact, out)
        }
        Cmd::Tokens { input } => {
            let input = utf8(input)?;
            let t = transpiler(config.as_deref(), &input)?;
            cmd_tokens(&t, &input, out)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    // déjà initialisé (tests, appels répétés) : on garde le premier
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn utf8(p: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(p).map_err(|p| eyre!("chemin non UTF-8 : {}", p.display()))
}

fn load_config(explicit: Option<&Utf8Path>, first_input: &Utf8Path) -> Result<Config> {
    let mut cfg = match explicit {
        Some(path) => Config::load(path).wrap_err_with(|| format!("config {path}"))?,
        None => {
            let candidate = first_input
                .parent()
                .map_or_else(|| Utf8PathBuf::from(CONFIG_FILE), |d| d.join(CONFIG_FILE));
            if candidate.is_file() {
                Config::load(&candidate).wrap_err_with(|| format!("config {candidate}"))?
            } else {
                debug!("pas de {candidate} : config par défaut");
                Config::default()
            }
        }
    };
    cfg.apply_env().wrap_err("variables GOLI_*")?;
    Ok(cfg)
}

fn transpiler(config: Option<&Utf8Path>, first_input: &Utf8Path) -> Result<Transpiler> {
    let cfg = load_config(config, first_input)?;
    let t = Transpiler::new(cfg)?;
    debug!(
        "indent {:?}, header {:?}, {} tête(s) de forme",
        t.config().indent,
        t.config().header,
        t.registry().len()
    );
    Ok(t)
}

fn read(input: &Utf8Path) -> Result<String> {
    fs::read_source(input).wrap_err_with(|| format!("lecture {input}"))
}

fn cmd_build(
    t: &Transpiler,
    inputs: &[Utf8PathBuf],
    output: Option<&Utf8Path>,
    out: &mut dyn Write,
) -> Result<()> {
    if let [input] = inputs {
        let go = t
            .transpile(&read(input)?)
            .wrap_err_with(|| format!("transpilation de {input}"))?;
        match output {
            Some(dst) => {
                fs::write_all(dst, go.as_bytes()).wrap_err_with(|| format!("écriture {dst}"))?;
                info!("{input} → {dst}");
            }
            None => out.write_all(go.as_bytes())?,
        }
        return Ok(());
    }

    for input in inputs {
        if fs::is_stdin(input) {
            bail!("`-` (stdin) n’est accepté qu’avec une seule entrée");
        }
        let go = t
            .transpile(&read(input)?)
            .wrap_err_with(|| format!("transpilation de {input}"))?;
        let dst = go_path(input, output);
        fs::write_all(&dst, go.as_bytes()).wrap_err_with(|| format!("écriture {dst}"))?;
        writeln!(out, "{input} → {dst}")?;
    }
    Ok(())
}

/// `src/main.goli` → `src/main.go`, ou `<dir>/main.go` si un dossier est donné.
fn go_path(input: &Utf8Path, dir: Option<&Utf8Path>) -> Utf8PathBuf {
    let file = format!("{}.go", input.file_stem().unwrap_or("out"));
    match dir {
        Some(d) => d.join(file),
        None => input.with_file_name(file),
    }
}

fn cmd_ast(t: &Transpiler, input: &Utf8Path, compact: bool, out: &mut dyn Write) -> Result<()> {
    let ast = t.parse(&read(input)?).wrap_err_with(|| format!("analyse de {input}"))?;
    let json = ast.to_json();
    let text = if compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    writeln!(out, "{text}")?;
    Ok(())
}

fn cmd_tokens(t: &Transpiler, input: &Utf8Path, out: &mut dyn Write) -> Result<()> {
    for tok in t.tokens(&read(input)?).iter().filter(|s| !s.is_empty()) {
        writeln!(out, "{tok}")?;
    }
    Ok(())
}
