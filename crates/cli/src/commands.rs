use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scheduled sync and the HTTP trigger until interrupted
    Serve,
    /// Run a single sync cycle and exit
    Sync {
        #[arg(long, help = "Load the whole source table instead of new rows only")]
        bulk: bool,

        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },
    /// Inspect or override the persisted watermark
    Watermark {
        #[command(subcommand)]
        command: WatermarkCommand,
    },
    /// Connect to the source database and count rows
    TestConn,
}

#[derive(Subcommand, Debug)]
pub enum WatermarkCommand {
    Show {
        #[arg(long, help = "Print the watermark as JSON")]
        json: bool,
    },
    /// Overwrite the watermark, e.g. `2024-05-01T00:00:00Z`
    Set { timestamp: String },
    /// Remove the watermark; the next cycle starts from the lookback window
    Clear,
}
