//! cogbench-providers: classification backends, speech fakes and config.
//!
//! Implements the `Classifier` trait over HTTP (plus a mock for tests and
//! offline runs), provides `SpeechEngine` fakes for headless play, and loads
//! `cogbench.toml`.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod speech;

pub use config::{create_classifier, load_config, load_config_from, CogbenchConfig};
pub use error::ClassifierError;
pub use http::HttpClassifier;
pub use mock::MockClassifier;
pub use speech::{ScriptedSpeech, SilentSpeech};
