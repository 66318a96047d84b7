//! Configuration module

mod images;
mod site;

pub use images::ImagePolicy;
pub use site::ImagesConfig;
pub use site::SiteConfig;
pub use site::WORDPRESS_URL_ENV;
