pub use coursereg_models::class_sections::*;
