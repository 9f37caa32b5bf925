pub mod dna;
pub mod logging;
pub mod naive;
