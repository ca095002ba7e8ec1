use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    pub uuid: String,
    pub name: String,

    /// Number of live posts referencing this tag. Incremented once per post
    /// create and decremented once per post delete, always through a
    /// storage-side `$inc`; clamped at zero, a failed decrement is a
    /// data-integrity alarm.
    pub count: i64,
}
