pub mod example;
pub mod organization;

pub use example::{CreateExampleInput, Example, MarkupInput, NewExample, UpdateExampleInput};
pub use organization::{Organization, OrganizationSummary, UpdateOrganizationInput};
