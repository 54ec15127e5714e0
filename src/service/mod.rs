//! Entity services: validation plus lookup-before-mutate over a `Store`.

mod owner;
mod pet;
mod validation;
pub use owner::OwnerService;
pub use pet::PetService;
pub use validation::RequestValidator;
