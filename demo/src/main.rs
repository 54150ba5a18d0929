use clap::Parser;
use linkstack::LinkStack;
use rand::Rng;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// Number of elements to sort per trial.
    #[arg(short, long, default_value_t = 3000)]
    count: usize,

    /// Number of timed trials.
    #[arg(short, long, default_value_t = 20)]
    trials: u32,

    /// Elements are drawn uniformly from -spread..=spread.
    #[arg(short, long, default_value_t = 500)]
    spread: i32,

    #[arg(short, long, default_value_t = 2)]
    log_level: usize,
}

fn main() {
    let args = Arguments::parse();

    stderrlog::new()
        .verbosity(args.log_level)
        .module(module_path!())
        .init()
        .unwrap();

    log::info!(
        "sorting {} pseudo-random elements per trial, {} trials",
        args.count,
        args.trials
    );

    let spread = args.spread.abs();
    let measurement = timeit::timeit(
        || {
            let mut rng = rand::thread_rng();
            let mut stack = LinkStack::new();
            for _ in 0..args.count {
                stack.push(rng.gen_range(-spread..=spread));
            }
            stack
        },
        |mut stack: LinkStack<i32>| stack.sort_by(|a, b| a < b),
        args.trials,
    );

    println!("{measurement}");
}
