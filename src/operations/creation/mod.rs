mod make_part;

pub use make_part::{compute_new_part, MakePart};
