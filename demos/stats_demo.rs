use clap::Parser;
use probe_hash::FoldIndex;
use probe_hash::HashTable;
use probe_hash::IndexHasher;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert.
    #[arg(short = 'n', long = "keys", default_value_t = 1000)]
    keys: usize,

    /// Remove every k-th key after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,

    /// Place keys with foldhash instead of the rolling hash.
    #[arg(long = "foldhash")]
    foldhash: bool,
}

fn run<H: IndexHasher>(args: &Args, mut table: HashTable<usize, H>) {
    println!("Filling table with {} keys...", args.keys);

    let mut resizes = 0;
    for i in 0..args.keys {
        let capacity = table.capacity();
        table.set(format!("key_{i:08}"), i);
        if table.capacity() != capacity {
            resizes += 1;
        }
    }

    println!(
        "Inserted {} keys, {} resizes, {} slots",
        table.len(),
        resizes,
        table.capacity()
    );

    if args.remove_every > 0 {
        for i in (0..args.keys).step_by(args.remove_every) {
            table.remove(&format!("key_{i:08}"));
        }
        println!("Removed keys, {} remain", table.len());
    }

    table.probe_histogram().print();
    table.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    if args.foldhash {
        run(&args, HashTable::with_hasher(FoldIndex::default()));
    } else {
        run(&args, HashTable::new());
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn every_argument_is_documented() {
        let command = Args::command();
        command.clone().debug_assert();
        for arg in command.get_arguments() {
            assert!(arg.get_help().is_some(), "no help for {}", arg.get_id());
        }
    }
}
