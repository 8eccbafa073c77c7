use clap::{Parser, Subcommand};
use spinphase::physics::RuleTable;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spinphase")]
#[command(author, version, about = "Classify spin-lattice configurations and build phase diagrams")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Sweep configuration (JSON); defaults to the per-user config location
    #[arg(long, short, global = true, env = "SPINPHASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify every grid point and write the phase diagram
    Sweep {
        /// Rule table (ferro_spiral_skyrmions, ferro_and_align_with_domain_walls)
        #[arg(long)]
        rules: Option<RuleTable>,

        /// Output file for the colour grid (JSON)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Classify a single spin configuration
    Classify {
        /// Neighbour-list structure file
        #[arg(long)]
        structure: PathBuf,

        /// Spin configuration file
        #[arg(long)]
        spins: PathBuf,

        /// Rule table (ferro_spiral_skyrmions, ferro_and_align_with_domain_walls)
        #[arg(long, default_value = "ferro_spiral_skyrmions")]
        rules: RuleTable,
    },

    /// Print the spin file a grid point resolves to
    Resolve {
        /// Value of the first variable
        #[arg(allow_negative_numbers = true)]
        var1: f64,

        /// Value of the second variable
        #[arg(allow_negative_numbers = true)]
        var2: f64,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
