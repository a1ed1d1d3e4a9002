//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing

mod mock_provider;

pub use mock_provider::{
    MockAIProvider, MockError, MockResponse, RecordedCall, DEFAULT_MOCK_RESPONSE,
};
