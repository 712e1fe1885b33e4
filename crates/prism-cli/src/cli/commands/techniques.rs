use crate::exit_codes;
use prism_core::model::Technique;

pub fn run() -> i32 {
    for t in Technique::ALL {
        println!("{:<18}\t{:<18}\t{}", t.slug(), t.label(), t.description());
    }
    exit_codes::SUCCESS
}
