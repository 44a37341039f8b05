use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "qx_sim", about = "Sparse state-vector quantum circuit simulator")]
pub struct Options {
    #[structopt(
        parse(from_os_str),
        name = "input",
        short = "i",
        long = "input",
        help = "path to the input cQASM file"
    )]
    pub input: PathBuf,

    #[structopt(
        parse(from_os_str),
        name = "output",
        short = "o",
        long = "output",
        help = "file in which to write the results as JSON. if not specified, results are printed"
    )]
    pub output: Option<PathBuf>,

    #[structopt(
        name = "shots",
        short = "n",
        long = "shots",
        default_value = "1",
        help = "number of independent executions of the circuits"
    )]
    pub shots: u64,

    #[structopt(
        name = "seed",
        short = "s",
        long = "seed",
        help = "seed of the random generators, random if not specified"
    )]
    pub seed: Option<u64>,

    #[structopt(
        name = "top",
        short = "t",
        long = "top",
        help = "only print the given number of largest amplitudes of the final state"
    )]
    pub top: Option<usize>,
}
