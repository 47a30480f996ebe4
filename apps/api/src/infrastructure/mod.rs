pub mod imaging;
pub mod mail;
pub mod pdf;
