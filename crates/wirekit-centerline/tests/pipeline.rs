#[path = "pipeline/fixtures.rs"]
mod fixtures;

#[path = "pipeline/cylinder.rs"]
mod cylinder;
#[path = "pipeline/determinism.rs"]
mod determinism;
#[path = "pipeline/failures.rs"]
mod failures;
#[path = "pipeline/properties.rs"]
mod properties;
