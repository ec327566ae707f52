pub use coursereg_models::reports::*;
