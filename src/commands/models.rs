use std::path::PathBuf;

/// Arguments for the generate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Directory holding consolidated.json and complexity.json
    pub results_dir: PathBuf,

    /// Directory the figures and figure data are written to
    pub output_dir: PathBuf,

    /// Optional TOML file overriding mechanisms, metrics and reserved ids
    pub config_path: Option<PathBuf>,

    /// Fail on pairs with more than one dedicated mechanism
    pub strict: bool,

    /// Skip SVG rendering, write figure data only
    pub no_svg: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Title of the cross-pair figure (optional)
    pub title: Option<String>,

    /// Width of the cross-pair figure in pixels
    pub width: usize,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("tests/results"),
            output_dir: PathBuf::from("assets/images"),
            config_path: None,
            strict: false,
            no_svg: false,
            print_summary: false,
            title: None,
            width: 1200,
        }
    }
}
