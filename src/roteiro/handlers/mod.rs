pub mod health;
pub use self::health::health;

pub mod pages;
pub use self::pages::{admin, index, not_found, public_trips};

pub mod proxy;
pub use self::proxy::{proxy_forgot_password, proxy_login};
