pub mod ntfy_client;
pub mod two_captcha;

pub use ntfy_client::NtfyClient;
pub use two_captcha::TwoCaptchaClient;
