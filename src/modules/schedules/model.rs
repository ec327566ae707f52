pub use coursereg_models::schedules::*;
