use clap::Parser;

/// Risk and compliance calculator: tallies the observations of each clinic per fiscal quarter
/// and reports the percentage of the quarterly requirement that has been met.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The Excel file (.xlsx) with the form responses. The clinic name is read from
    /// column H and the date of the observation from column I.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default: first worksheet) When the Excel file has several worksheets, indicates the name of
    /// the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (directory, default: the Downloads folder of the user) Where the Excel report is written.
    #[clap(long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the results will also be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed as an argument, the report is not opened after it has been written.
    #[clap(long, takes_value = false)]
    pub no_open: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
