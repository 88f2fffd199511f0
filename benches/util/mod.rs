pub mod davidson_dense;
