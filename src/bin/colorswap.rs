use clap::{App, Arg};
use log::info;

const INPUT: &str = "input";
const OUTPUT: &str = "output";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = App::new("colorswap")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Rewrites an RGB image as 16-bit PNG with its channels in blue, red, green order")
        .arg(
            Arg::with_name(INPUT)
                .required(true)
                .index(1)
                .help("Image to read"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .index(2)
                .help("PNG file to write"),
        )
        .get_matches();

    let input = matches.value_of(INPUT).unwrap_or_default();
    let output = matches.value_of(OUTPUT).unwrap_or_default();
    match nebulabrot::assemble::swap_file(input, output) {
        Ok((width, height)) => info!("Wrote {}x{} image to {}", width, height, output),
        Err(e) => {
            eprintln!("Swap failure: {}", e);
            std::process::exit(1);
        }
    }
}
