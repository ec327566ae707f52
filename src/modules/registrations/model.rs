pub use coursereg_models::registrations::*;
