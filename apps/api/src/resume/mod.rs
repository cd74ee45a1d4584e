pub mod drafts;
pub mod handlers;
pub mod parser;
pub mod store;
pub mod upload;
pub mod validation;
