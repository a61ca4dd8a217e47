pub mod record;
pub mod state;
pub mod timer;

pub use record::ResultRecord;
pub use state::{FinishError, Phase, Session, SessionError, SourceKind};
pub use timer::SessionTimer;
