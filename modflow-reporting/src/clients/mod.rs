pub mod classifier;
pub mod mod_channels;
pub mod platform;

pub use classifier::HttpClassifier;
pub use mod_channels::WebhookModChannels;
pub use platform::HttpPlatform;
