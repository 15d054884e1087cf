/// Identifies one impact-site selection.
///
/// Tokens are minted in strictly increasing order; an async result tagged with
/// a token other than the session's current one belongs to a superseded site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteToken(u64);

impl SiteToken {
    /// Token of a session that has never selected a site.
    pub const NONE: SiteToken = SiteToken(0);

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        SiteToken(self.0.wrapping_add(1))
    }
}
