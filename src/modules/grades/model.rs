pub use coursereg_models::grades::*;
