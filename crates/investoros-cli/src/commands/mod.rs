pub mod underwrite;
