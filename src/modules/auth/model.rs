pub use coursereg_models::auth::*;
