use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON config overriding container names, guards and includes
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Log more (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the object container into a header/source pair
    Objects {
        /// Input .tmx map
        input: PathBuf,
        /// Project directory the files are written under
        project_dir: PathBuf,
        /// Header path relative to the project, e.g. `fase1_obj.h`
        header: String,
        /// Object container to read instead of the configured one
        #[arg(long)]
        container: Option<String>,
        /// Also write the grouped object model as JSON
        #[arg(long, value_name = "FILE")]
        dump_model: Option<PathBuf>,
    },
    /// Compile the collision layer into a `CollisionArray` header
    Collision {
        /// Input .tmx map
        input: PathBuf,
        /// Output directory
        out_dir: PathBuf,
        /// Header file name; the array is named after it
        header: String,
        /// Run-length encode the grid
        #[arg(long)]
        rle: bool,
        /// Layer to read instead of the configured one
        #[arg(long)]
        layer: Option<String>,
    },
    /// Export slope segments into a header
    Slopes {
        /// Input .tmx map
        input: PathBuf,
        /// Output header file
        output: PathBuf,
        /// Object container to read instead of the configured one
        #[arg(long)]
        container: Option<String>,
    },
}
