use clap::{Parser, ValueEnum};
use log::info;
use maze_print::{Config, Error, Framing, Maze, Printer};
use std::{fs::File, io, path::PathBuf};

//
// cargo run -- --format escpos > /dev/usb/lp0
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Binary PBM image
    Pbm,
    /// ESC/POS raster image for thermal printers
    Escpos,
    /// Text drawing followed by a paper cut
    Text,
}

/// Generate a printable maze
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = 42)]
    width: u32,

    /// Maze height in cells
    #[arg(long, default_value_t = 64)]
    height: u32,

    /// Pixels per cell
    #[arg(long, default_value_t = 13)]
    scale: u32,

    /// Random seed
    #[arg(long, default_value_t = 389055)]
    seed: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pbm)]
    format: Format,

    /// Line feeds after an ESC/POS image (text output always feeds 4 lines)
    #[arg(long, default_value_t = 5)]
    feed: u8,

    /// Skip the paper cut after an ESC/POS image (text output is always cut)
    #[arg(long)]
    no_cut: bool,

    /// Record the revisit flag on the maze (not used by carving)
    #[arg(long)]
    revisit: bool,

    /// Output file, standard output when absent
    #[arg(long)]
    output: Option<PathBuf>,
}

fn run<W: io::Write>(args: &Args, writer: W) -> Result<usize, Error> {
    let mut maze = Maze::new(args.width, args.height, args.scale, args.revisit)?;
    maze.generate_seeded(args.seed);

    let framing = match args.format {
        Format::Escpos => Framing::EscPos,
        _ => Framing::Pbm,
    };
    let config = Config::new(framing)
        .feed_lines(args.feed)
        .cut_at_end(!args.no_cut);
    let mut printer = Printer::new(writer, config);

    match args.format {
        Format::Text => printer.print_preview(&maze.preview()),
        _ => printer.print(&maze.export()),
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    let written = match &args.output {
        Some(path) => run(&args, File::create(path)?)?,
        None => run(&args, io::stdout().lock())?,
    };
    info!("wrote {} bytes", written);

    Ok(())
}
