//! Data structures module
//!
//! Employee records, the synthetic population generator, the in-memory
//! table and the numeric dataset fed to the classifier.

mod dataset;
mod employee;
mod generator;
mod population;

pub use dataset::{Dataset, Split};
pub use employee::{ActiveStatus, Department, Employee};
pub use generator::{
    DepartmentWeights, GeneratorOptions, PopulationGenerator, SamplingProfile, NOISE_STD,
};
pub use population::{EmployeeFilter, Population};
