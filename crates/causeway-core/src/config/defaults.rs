// Single source of truth for all default values.

// --- Adjacency search ---
/// -1 means "no bound": conditioning sets may grow to the neighbor-set size.
pub const DEFAULT_MAX_DEPTH: i64 = -1;
pub const DEFAULT_PARALLEL: bool = false;

// --- Orientation ---
pub const DEFAULT_PREVENT_CYCLES: bool = false;

// --- FCI ---
pub const DEFAULT_POSSIBLE_DSEP: bool = true;
/// -1 means "no bound" on discriminating / possible-d-sep path length.
pub const DEFAULT_MAX_PATH_LENGTH: i64 = -1;

// --- Knowledge ---
pub const DEFAULT_STRICT_KNOWLEDGE: bool = false;

// --- Observability ---
pub const LOG_ENV_VAR: &str = "CAUSEWAY_LOG";
pub const DEFAULT_LOG_FILTER: &str = "causeway=info";
