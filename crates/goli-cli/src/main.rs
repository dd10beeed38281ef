//! goli — binaire : délègue à `goli_cli::run`.

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    goli_cli::run()
}
