pub mod handler;
mod service;
pub mod types;
pub mod validator;

pub use handler::create_image_router;
pub use service::ImageService;
pub use types::{ImageInfo, ResizeRequest, ResizedImage, UploadForm, UploadedImage};
