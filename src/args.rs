use clap::Parser;

/// Ranks the core courses of a graduate program exit survey by how beneficial the
/// students found them.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The survey export, in Excel format. The first row must hold the question headers.
    #[clap(short, long, value_parser, default_value = "data/Grad Program Exit Survey Data.xlsx")]
    pub input: String,

    /// (directory) Where the ranking CSV and the bar chart are written. Created if missing, existing
    /// files are overwritten.
    #[clap(short, long, value_parser, default_value = "outputs")]
    pub output_dir: String,

    /// (default: first worksheet) The name of the worksheet to read in the Excel file.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) A ranking CSV from a previous run. If provided, corerank checks that the
    /// new CSV is identical and fails otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the run will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
