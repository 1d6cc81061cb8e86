use clap::Parser;

/// Arguments for samples command
#[derive(Parser, Debug)]
pub struct SamplesArgs {
    /// Print the samples directory instead of opening it
    #[arg(long)]
    pub print: bool,
}
