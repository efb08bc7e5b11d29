// Core exports
pub mod context;
pub mod matcher;
pub mod selection;
pub mod session;
pub mod stream;

pub use context::AppContext;
pub use matcher::{MatchError, MatchResolver};
pub use selection::SelectionSet;
pub use session::{SessionError, SessionState};
pub use stream::{DogStream, FetchOutcome, StreamError, StreamPhase};
