pub mod file_formats;
pub mod growth;
pub mod medium;
pub mod model_profile;
pub mod network;
pub mod path;
pub mod reference;
