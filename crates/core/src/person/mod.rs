mod error;
mod requests;
mod types;

pub use error::PersonError;
pub use requests::{CreatePersonRequest, CreatedPerson, ListPeopleQuery, UpdatePersonRequest};
pub use types::{Filter, NewPerson, Person, Sex};
