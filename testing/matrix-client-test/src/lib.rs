mod sync_builder;
pub mod test_json;

pub use self::sync_builder::{
    EphemeralTestEvent, InvitedRoomBuilder, JoinedRoomBuilder, LeftRoomBuilder, PresenceTestEvent,
    RoomAccountDataTestEvent, StateTestEvent, SyncResponseBuilder,
};

/// The room id most fixtures and the room builders default to.
pub const DEFAULT_TEST_ROOM_ID: &str = "!SVkFJHzfwvuaIEawgC:localhost";

/// The user the canned login response logs in as.
pub const TEST_USER_ID: &str = "@example:localhost";

/// The access token of the canned login response.
pub const TEST_ACCESS_TOKEN: &str = "abc123";

#[doc(hidden)]
pub mod __macro_support {
    pub use ctor;
    pub use tracing_subscriber;
}

/// Install a `tracing` subscriber writing to the test output, filtered by
/// `RUST_LOG`, before any test of the crate runs.
#[macro_export]
macro_rules! init_tracing_for_tests {
    () => {
        #[$crate::__macro_support::ctor::ctor]
        fn init_logging() {
            use $crate::__macro_support::tracing_subscriber::{
                self, layer::SubscriberExt, util::SubscriberInitExt,
            };

            tracing_subscriber::registry()
                .with(tracing_subscriber::EnvFilter::from_default_env())
                .with(tracing_subscriber::fmt::layer().with_test_writer())
                .init();
        }
    };
}
