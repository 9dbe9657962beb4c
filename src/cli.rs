use clap::Parser;
use std::path::PathBuf;

/// Preview server for the Jedi form editor widget
#[derive(Parser, Debug, Clone)]
#[command(name = "jedi-preview", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "JEDI_CONFIG", default_value = "jedi.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "JEDI_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "JEDI_PORT")]
    pub port: Option<u16>,

    /// Schema file rendered by the preview page (JSON, YAML or TOML)
    #[arg(short, long, env = "JEDI_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Directory served under /assets (editor library files)
    #[arg(long, env = "JEDI_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Do not reload the schema when the file changes
    #[arg(long)]
    pub no_watch: bool,
}
