//! Player identity and the per-action mining context.

use crate::tool::{Enchantments, ToolState, ToolTraits};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Milliseconds since the Unix epoch, supplied by the caller.
pub type Millis = u64;

/// Base permission for vein mining.
pub const PERMISSION_USE: &str = "veinminer.use";

/// Prefix of the per-block permission, followed by the short block id.
pub const PERMISSION_BLOCK_PREFIX: &str = "veinminer.blocks.";

/// Stable player identifier (usually a UUID string).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Everything the engine needs to know about the player for one action.
#[derive(Clone, Debug, Default)]
pub struct PlayerMiningContext {
    /// Who is mining.
    pub player_id: PlayerId,
    /// Item id of the tool in hand. Empty for bare hand.
    pub tool_id: String,
    /// Enchantments on the tool.
    pub enchantments: Enchantments,
    /// Granted permission nodes.
    pub permissions: BTreeSet<String>,
    /// Maximum distance from the origin a vein block may be.
    pub reach_distance: Option<f64>,
    /// Whether the player is sneaking.
    pub sneaking: bool,
    /// World name.
    pub world: String,
    /// Durability of the tool in hand.
    pub tool: ToolState,
}

impl PlayerMiningContext {
    /// Creates a context for a player holding a tool.
    #[must_use]
    pub fn new(player_id: impl Into<PlayerId>, tool_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            tool_id: tool_id.into(),
            ..Self::default()
        }
    }

    /// Builder: grants permission nodes.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(perms.into_iter().map(Into::into));
        self
    }

    /// Builder: sets enchantments.
    #[must_use]
    pub fn with_enchantments(mut self, enchantments: Enchantments) -> Self {
        self.enchantments = enchantments;
        self
    }

    /// Builder: sets tool durability.
    #[must_use]
    pub fn with_tool_state(mut self, tool: ToolState) -> Self {
        self.tool = tool;
        self
    }

    /// Builder: sets sneaking.
    #[must_use]
    pub fn sneaking(mut self, sneaking: bool) -> Self {
        self.sneaking = sneaking;
        self
    }

    /// Builder: sets the world name.
    #[must_use]
    pub fn in_world(mut self, world: impl Into<String>) -> Self {
        self.world = world.into();
        self
    }

    /// Tool traits of the held item.
    #[must_use]
    pub fn tool_traits(&self) -> ToolTraits {
        ToolTraits::of(&self.tool_id)
    }

    /// True if the player holds the exact permission node.
    #[must_use]
    pub fn has_permission(&self, node: &str) -> bool {
        self.permissions.contains(node)
    }
}
