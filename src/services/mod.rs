pub mod credentials;
pub mod encoders;
pub mod providers;
pub mod recommendations;
pub mod track_resolver;

pub use credentials::CredentialResolver;
pub use encoders::{EncoderRegistry, SecretDecoder};
pub use recommendations::RecommendationService;
pub use track_resolver::TrackResolver;
