// Load a handful of keys and report, for every probe, either its exact
// rank or the pair of ranks it falls between.

use llrb_rank::Llrb;

fn main() {
    let mut llrb: Llrb<i64, ()> = Llrb::new("index-example");
    for key in (0..=4).step_by(2) {
        llrb.replace_or_insert(key, ());
    }

    println!("{} items in tree", llrb.len());

    for key in 0..=4 {
        match llrb.index_of(&key) {
            Some(index) => println!("{} is at {}", key, index),
            None => {
                let low = match llrb.index_of_less_or_equal(&key) {
                    Some(index) => index as isize,
                    None => -1,
                };
                let high = llrb.index_of_greater_or_equal(&key);
                println!("{} is between {} and {}", key, low, high);
            }
        }
    }

    match llrb.validate() {
        Ok(stats) => {
            if let Some(depths) = stats.depths() {
                depths.pretty_print("");
            }
        }
        Err(err) => println!("invalid tree: {}", err),
    }
}
