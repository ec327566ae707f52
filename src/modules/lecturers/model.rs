pub use coursereg_models::lecturers::*;
