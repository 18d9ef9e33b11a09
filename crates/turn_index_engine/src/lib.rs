//! Turn index engine: platform detection, turn extraction, change watching
//! and navigation over a host page.
mod classify;
mod dedupe;
mod decode;
mod detect;
mod extract;
mod highlight;
mod page;
mod platform;
mod preview;
mod selectors;
mod settings;
mod types;
mod watch;

pub use decode::{decode_snapshot, DecodeError, DecodedSnapshot};
pub use dedupe::PreviewDeduper;
pub use detect::{detect_from_location, detect_platform, ActivePlatform};
pub use extract::{HeuristicTurnExtractor, TurnExtractor};
pub use highlight::{navigate_to, HighlightGuard};
pub use page::{hostname_of, ElementHandle, HostPage, MutationRecord};
pub use platform::{
    ContentRule, ContentRules, PlatformId, PlatformProfile, REGISTRY, UNKNOWN,
};
pub use preview::{build_preview, normalize_whitespace, truncate_preview};
pub use selectors::{SelectorError, SelectorList};
pub use settings::{ExtractionSettings, HighlightSettings, WatchSettings};
pub use types::{ConversationTurn, Role};
pub use watch::{MutationWatcher, RelevanceFilter, WatchError};
