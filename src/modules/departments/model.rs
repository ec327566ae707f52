pub use coursereg_models::departments::*;
