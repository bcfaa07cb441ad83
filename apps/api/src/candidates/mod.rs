// Candidate intake and directory.
// Handlers stay thin: validation, storage and persistence live in the service modules.

pub mod directory;
pub mod handlers;
pub mod intake;
pub mod repository;
pub mod validation;
