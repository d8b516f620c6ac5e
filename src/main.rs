use clap::Parser;
use log::info;

use threshold_rs::enumerate::{Enumerator, MAX_SUPPORTED_N};
use threshold_rs::labeling::total_labelings;
use threshold_rs::simplex::{Simplex, DEFAULT_MAX_ITERATIONS};
use threshold_rs::Config;

/// Count the linearly separable Boolean functions of N variables.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Numbers of variables to enumerate.
    #[arg(value_name = "N", default_values_t = [2, 3, 4])]
    ns: Vec<usize>,

    /// Largest accepted N.
    #[arg(long, value_name = "INT", default_value_t = 4)]
    max_n: usize,

    /// Worker threads (0 = one per core).
    #[arg(long, value_name = "INT", default_value_t = 0)]
    threads: usize,

    /// Check labelings one by one on the current thread.
    #[arg(long)]
    sequential: bool,

    /// Check every labeling instead of only one of each complementary pair.
    #[arg(long)]
    no_symmetry: bool,

    /// Pivot budget per LP solve.
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Also print the total number of functions.
    #[arg(long)]
    total: bool,

    /// More logging (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = match args.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    log::debug!("args = {:?}", args);

    if args.max_n > MAX_SUPPORTED_N {
        log::warn!("--max-n {} is above the supported maximum {}", args.max_n, MAX_SUPPORTED_N);
    }

    let config = Config {
        max_n: args.max_n,
        parallel: !args.sequential,
        threads: args.threads,
        symmetry: !args.no_symmetry,
        ..Config::default()
    };
    let enumerator = Enumerator::new(config, Simplex::new(args.max_iterations));

    // Validate everything up front so that no partial output is printed.
    for &n in &args.ns {
        enumerator.check_range(n)?;
    }

    for &n in &args.ns {
        info!("Enumerating {} Boolean functions of N = {} variables...", total_labelings(n), n);
        let report = enumerator.report(n)?;
        if args.total {
            println!("{} of {}", report, report.total);
        } else {
            println!("{}", report);
        }
    }

    let time_total = time_total.elapsed();
    info!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
