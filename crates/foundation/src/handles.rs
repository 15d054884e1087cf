/// Generational handle into a resource table owned by an external substrate.
///
/// The generation distinguishes a reused slot from the resource that used to
/// live there, so a stale handle never aliases a newer resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle { index, generation }
    }
}
