pub use coursereg_models::courses::*;
