use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Lower-case tag of a process group, as derived from `processGroupStatusSnapshots`.
pub const PROCESS_GROUP_TAG: &str = "processgroup";
pub const REMOTE_PROCESS_GROUP_TAG: &str = "remoteprocessgroup";
pub const PROCESSOR_TAG: &str = "processor";
pub const CONNECTION_TAG: &str = "connection";
pub const INPUT_PORT_TAG: &str = "inputport";
pub const OUTPUT_PORT_TAG: &str = "outputport";

/// Label used for anything that could not be classified.
pub const UNKNOWN_LABEL: &str = "unknown";

/// The kind of a flow component.
///
/// Discriminants are the flag bits used by [`KindSet`]. The derived ordering
/// follows declaration order, so sorting by kind puts process groups first
/// and unknown components last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ComponentKind {
    ProcessGroup = 1 << 0,
    RemoteProcessGroup = 1 << 1,
    Processor = 1 << 2,
    Connection = 1 << 3,
    InputPort = 1 << 4,
    OutputPort = 1 << 5,
    Unknown = 1 << 6,
}

impl ComponentKind {
    /// Every kind, in sort order.
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::ProcessGroup,
        ComponentKind::RemoteProcessGroup,
        ComponentKind::Processor,
        ComponentKind::Connection,
        ComponentKind::InputPort,
        ComponentKind::OutputPort,
        ComponentKind::Unknown,
    ];

    /// Match a lower-case kind tag. Matching is case-sensitive;
    /// anything else is [`ComponentKind::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            PROCESS_GROUP_TAG => Self::ProcessGroup,
            REMOTE_PROCESS_GROUP_TAG => Self::RemoteProcessGroup,
            PROCESSOR_TAG => Self::Processor,
            CONNECTION_TAG => Self::Connection,
            INPUT_PORT_TAG => Self::InputPort,
            OUTPUT_PORT_TAG => Self::OutputPort,
            _ => Self::Unknown,
        }
    }

    /// The lower-case tag for this kind, `None` for [`ComponentKind::Unknown`].
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::ProcessGroup => Some(PROCESS_GROUP_TAG),
            Self::RemoteProcessGroup => Some(REMOTE_PROCESS_GROUP_TAG),
            Self::Processor => Some(PROCESSOR_TAG),
            Self::Connection => Some(CONNECTION_TAG),
            Self::InputPort => Some(INPUT_PORT_TAG),
            Self::OutputPort => Some(OUTPUT_PORT_TAG),
            Self::Unknown => None,
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ProcessGroup => "Process Group",
            Self::RemoteProcessGroup => "Remote Process Group",
            Self::Processor => "Processor",
            Self::Connection => "Connection",
            Self::InputPort => "Input Port",
            Self::OutputPort => "Output Port",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    /// The single-bit flag for this kind.
    pub fn flag(&self) -> KindSet {
        KindSet::from_bits_truncate(*self as u8)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

bitflags! {
    /// A set of component kinds used to filter traversals.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct KindSet: u8 {
        const PROCESS_GROUP        = ComponentKind::ProcessGroup as u8;
        const REMOTE_PROCESS_GROUP = ComponentKind::RemoteProcessGroup as u8;
        const PROCESSOR            = ComponentKind::Processor as u8;
        const CONNECTION           = ComponentKind::Connection as u8;
        const INPUT_PORT           = ComponentKind::InputPort as u8;
        const OUTPUT_PORT          = ComponentKind::OutputPort as u8;
        const UNKNOWN              = ComponentKind::Unknown as u8;
    }
}

impl KindSet {
    /// Every kind, unknown included.
    pub const ALL_KINDS: KindSet = KindSet::all();

    /// Every kind except connections. Connections make listings noisy, so
    /// this is the usual default.
    pub const ALL_EXCEPT_CONNECTIONS: KindSet =
        KindSet::from_bits_truncate(KindSet::all().bits() & !KindSet::CONNECTION.bits());

    pub fn includes(&self, kind: ComponentKind) -> bool {
        self.intersects(kind.flag())
    }

    /// The kind this set stands for when exactly one flag is set.
    pub fn single_kind(&self) -> Option<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.flag() == *self)
    }

    /// Title of the single kind in this set, `"unknown"` otherwise.
    pub fn label(&self) -> &'static str {
        self.single_kind()
            .map(|kind| kind.title())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Build a set from kind tags. Tags are trimmed and lower-cased, and
    /// `"unknown"` is accepted for [`ComponentKind::Unknown`]. At least one
    /// tag must be given.
    pub fn from_tags<I, S>(tags: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = KindSet::empty();
        for tag in tags {
            let tag = tag.as_ref().trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            let kind = match ComponentKind::from_tag(&tag) {
                ComponentKind::Unknown if tag != UNKNOWN_LABEL => {
                    return Err(format!("unknown component kind: {}", tag));
                }
                kind => kind,
            };
            set |= kind.flag();
        }
        if set.is_empty() {
            return Err("no component kinds given".to_string());
        }
        Ok(set)
    }

    /// Tags of every kind in this set, in sort order.
    pub fn tags(&self) -> Vec<String> {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.includes(*kind))
            .map(|kind| kind.tag().unwrap_or(UNKNOWN_LABEL).to_string())
            .collect()
    }
}

impl Default for KindSet {
    fn default() -> Self {
        KindSet::ALL_EXCEPT_CONNECTIONS
    }
}

impl From<ComponentKind> for KindSet {
    fn from(kind: ComponentKind) -> Self {
        kind.flag()
    }
}

impl FromStr for KindSet {
    type Err = String;

    /// Parse a comma-separated list of tags, e.g. `processor,inputport`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KindSet::from_tags(s.split(','))
    }
}
