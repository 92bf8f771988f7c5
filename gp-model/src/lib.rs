pub mod common; // matrix and vector type aliases
pub mod errors; // shared error taxonomy
pub mod gaussian; // explicit multivariate normal with cholesky sampling
pub mod posterior; // sparse posterior object and variational variants
pub mod simulate; // simulation collaborators for tests and demos
pub mod traits; // prior process and weight-space seams
