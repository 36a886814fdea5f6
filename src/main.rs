use std::env;
use std::process;
use std::time::Instant;

use taskpool::{EventFilter, EventStore};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input_01.txt".to_owned());
    let pattern = args.next().unwrap_or_else(|| ".*(porn|xxx).*".to_owned());

    println!("taskpool - browsing log filter demo\n");

    let start = Instant::now();
    let store = EventStore::new();
    if let Err(err) = store.read_from_file(&input) {
        eprintln!("error: {err}");
        process::exit(1);
    }
    println!(
        "Parsed {} fields from {} in {:?}",
        store.len(),
        input,
        start.elapsed()
    );

    let filter = match EventFilter::new(&pattern) {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("error: invalid filter pattern: {err}");
            process::exit(1);
        }
    };

    let start = Instant::now();
    match filter.count_matches(&store) {
        Ok(count) => {
            println!("Filtered with `{}` in {:?}", pattern, start.elapsed());
            println!("{count}");
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
