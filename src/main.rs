use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::warn;

use allegro_netlist::config::{Config, DEFAULT_CONFIG_FILE};
use allegro_netlist::output::{read_netlist, write_report, DEFAULT_REPORT_FILE};
use allegro_netlist::{parse_netlist, Error, Report};

/// Format Cadence Allegro Net-List (cnl - Cadence Net-List) to readable file
#[derive(Parser, Debug)]
#[command(name = "cnl_format", author, version, about, long_about = None)]
struct Args {
    /// The pstxnet.dat file to read. Defaults to the last one used.
    netlist: Option<PathBuf>,

    /// Report file to write, an existing one is renamed first
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
    output: PathBuf,

    /// List nets alphabetically instead of in file order
    #[arg(short, long)]
    sort: bool,

    /// Config file remembering the last net-list
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Also print the nets of this component
    #[arg(short, long = "refdes", value_name = "REFDES")]
    refdes: Vec<String>,

    /// More log output, repeat for debug messages
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = Config::load(&args.config);
    let netlist_path = args
        .netlist
        .clone()
        .or_else(|| config.netlist_file().map(Path::to_path_buf))
        .ok_or(Error::NoInput)?;

    config.set_netlist_file(&netlist_path);
    if let Err(err) = config.save(&args.config) {
        warn!("{}", err);
    }

    let text = read_netlist(&netlist_path)?;
    let netlist = parse_netlist(&text)?;
    let nets = netlist.nets();

    let report = Report::new(&nets, netlist.info)
        .source(&netlist_path)
        .sorted(args.sort)
        .render();
    if let Some(backup) = write_report(&args.output, &report)? {
        println!("renamed old file to {}", backup.display());
    }

    for refdes in &args.refdes {
        match nets.refdes_line(refdes) {
            Some(line) => println!("{line}"),
            None => eprintln!("Cannot find refdes '{}' in {}", refdes, netlist_path.display()),
        }
    }

    let done = chrono::Local::now().format("%H:%M:%S");
    let work_dir = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();
    println!(
        "Done: {done}\nwrote file: {}\n(output directory: {work_dir})",
        args.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
