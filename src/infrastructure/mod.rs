pub mod fs_store;
pub mod parsers;
pub mod s3_adapter;
