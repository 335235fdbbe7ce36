pub mod contact;
pub mod image;
