pub use coursereg_models::students::*;
