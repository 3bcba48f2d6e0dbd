use clap::{App, Arg, ArgMatches};
use log::info;
use nebulabrot::{ChannelOrder, Compositor, NebulaConfig};
use std::str::FromStr;

fn parse_triple<T>(s: &str, separator: char) -> Option<(T, T, T)>
where
    T: FromStr,
{
    let parts: Vec<&str> = s.split(separator).collect();
    if parts.len() != 3 {
        return None;
    }
    match (
        T::from_str(parts[0]),
        T::from_str(parts[1]),
        T::from_str(parts[2]),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
        _ => None,
    }
}

fn validate_triple(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_triple::<usize>(s, separator) {
        Some((r, g, b)) if r > 0 && g > 0 && b > 0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const SAMPLES: &str = "samples";
const PASSES: &str = "passes";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const SEED: &str = "seed";
const BATCH: &str = "batch";
const ORDER: &str = "order";
const REPLAY_CAP: &str = "replay-cap";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("nebula")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Nebulabrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1600")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_535,
                        "Could not parse output image size",
                        "Image size must be between 1 and 65535",
                    )
                })
                .help("Width and height of the square output image"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value("50000000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse sample count",
                        "Sample count must be positive",
                    )
                })
                .help("Random points chosen per channel per pass"),
        )
        .arg(
            Arg::with_name(PASSES)
                .long(PASSES)
                .short("p")
                .takes_value(true)
                .default_value("50")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse pass count",
                        "Pass count must be positive",
                    )
                })
                .help("Number of times to repeat the process"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("2500,250,25")
                .validator(|s| {
                    validate_triple(
                        &s,
                        ',',
                        "Iterations must be three positive numbers: red,green,blue",
                    )
                })
                .help("Bailout values (red, green, blue); higher means more detail"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .takes_value(true)
                .validator(|s| {
                    u64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse seed".to_string())
                })
                .help("Seed for a reproducible render"),
        )
        .arg(
            Arg::with_name(BATCH)
                .long(BATCH)
                .takes_value(true)
                .default_value("1048576")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse batch size",
                        "Batch size must be positive",
                    )
                })
                .help("Largest number of points held in memory at once"),
        )
        .arg(
            Arg::with_name(ORDER)
                .long(ORDER)
                .takes_value(true)
                .default_value("bgr")
                .validator(|s| {
                    ChannelOrder::from_str(&s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .help("Which channel fills each sample slot of a pixel"),
        )
        .arg(
            Arg::with_name(REPLAY_CAP)
                .long(REPLAY_CAP)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse replay cap",
                        "Replay cap must be positive",
                    )
                })
                .help("Longest orbit replay before a point is dropped"),
        )
        .get_matches()
}

fn config(matches: &ArgMatches) -> NebulaConfig {
    // Every value below has already been through its validator.
    let number = |name: &str| -> usize {
        usize::from_str(matches.value_of(name).unwrap_or_default()).unwrap_or_default()
    };
    let (red, green, blue) =
        parse_triple::<usize>(matches.value_of(ITERATIONS).unwrap_or_default(), ',')
            .unwrap_or((0, 0, 0));

    NebulaConfig {
        size: number(SIZE),
        samples: number(SAMPLES),
        passes: number(PASSES),
        channels: NebulaConfig::budgets(red, green, blue),
        batch_size: number(BATCH),
        threads: matches
            .value_of(THREADS)
            .and_then(|s| usize::from_str(s).ok())
            .unwrap_or_else(num_cpus::get),
        seed: matches.value_of(SEED).and_then(|s| u64::from_str(s).ok()),
        order: matches
            .value_of(ORDER)
            .and_then(|s| ChannelOrder::from_str(s).ok())
            .unwrap_or_default(),
        replay_cap: matches
            .value_of(REPLAY_CAP)
            .and_then(|s| usize::from_str(s).ok()),
    }
}

fn run(matches: &ArgMatches) -> nebulabrot::Result<()> {
    let compositor = Compositor::new(config(matches))?;
    let nebula = compositor.render()?;
    let output = matches.value_of(OUTPUT).unwrap_or("nebulabrot.png");
    info!("Saving image to {}", output);
    nebula.image(compositor.config().order)?.write_png(output)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
