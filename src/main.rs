use std::{fs, process};

use hier_cache::{report, trace, trace::Trace, Config, Error, Hierarchy};
use log::{error, info, LevelFilter};

fn main() {
    let mut args = pico_args::Arguments::from_env();
    let verbose = args.contains("-v");
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    if let Err(err) = run(args) {
        error!("{err}");
        process::exit(1);
    }
}

fn run(mut args: pico_args::Arguments) -> Result<(), Error> {
    let config: Config = if let Some(config_str) = args.opt_value_from_str::<_, String>("--config")? {
        Config::from_json(&config_str)?
    } else if let Some(config_path) = args.opt_value_from_str::<_, String>("-p")? {
        Config::from_json(&fs::read_to_string(config_path)?)?
    } else {
        Config::default()
    };
    let mut hierarchy = Hierarchy::new(&config)?;

    let stats_path: Option<String> = args.opt_value_from_str("--json")?;
    let show_geometry = args.contains("--geometry");
    let show_dump = args.contains("--dump");

    let trace_path: Option<String> = args.opt_value_from_str("-t")?;
    let n_random: Option<usize> = args.opt_value_from_str("--random")?;
    let seed: u64 = args.opt_value_from_str("--seed")?.unwrap_or(0);
    let addrs_per_block: usize = args
        .opt_value_from_str("--buffer-size")?
        .unwrap_or(1024 * 16);
    let blocks_per_queue: usize = args.opt_value_from_str("--queue-size")?.unwrap_or(32);

    for arg in args.finish() {
        log::warn!("ignoring unknown argument {arg:?}");
    }

    if show_geometry {
        for level in hierarchy.levels() {
            println!("{}", report::geometry_summary(level, hierarchy.address_bits()));
        }
    }

    if let Some(path) = trace_path {
        let trace = Trace::read(path.into(), addrs_per_block, blocks_per_queue)?;
        for block in trace {
            for address in block? {
                hierarchy.access(address)?;
            }
        }
    } else if let Some(n) = n_random {
        info!("running {n} random addresses (seed {seed})");
        hierarchy.run(trace::random(seed, n, config.address_bits))?;
    } else {
        info!("running the golden trace");
        hierarchy.run(trace::golden())?;
    }

    let stats = hierarchy.stats();
    print!("{}", report::summary(&hierarchy, &stats));

    if show_dump {
        for level in hierarchy.levels() {
            print!("{}", report::dump(level));
        }
    }

    if let Some(path) = stats_path {
        let stats_file = fs::File::create(path)?;
        serde_json::to_writer_pretty(stats_file, &stats)?;
    }
    Ok(())
}
