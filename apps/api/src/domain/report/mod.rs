pub mod entity;
pub mod errors;
pub mod ledger;
pub mod locale;
pub mod value_objects;
