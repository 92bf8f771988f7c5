pub mod inducing; // resolve q(u) from the variational parameterization
pub mod pathwise; // prior sample + pathwise correction
