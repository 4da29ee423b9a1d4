mod pollutant;

pub use pollutant::Pollutant;
