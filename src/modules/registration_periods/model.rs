pub use coursereg_models::registration_periods::*;
