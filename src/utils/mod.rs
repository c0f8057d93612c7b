pub mod numeric;

pub use numeric::{get_diff, rand_float, rand_floats, round_half, to_fixed};
