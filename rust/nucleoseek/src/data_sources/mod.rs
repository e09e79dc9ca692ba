pub mod database_file;
pub mod mgf;

pub use database_file::{
    read_database,
    read_database_file,
    read_database_files,
};
pub use mgf::{
    MgfReader,
    read_mgf_file,
};
