/// Outcome of a team membership lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// The membership endpoint answered 200.
    Member,
    /// Any other status; 404 is the usual answer for non-members.
    NotMember { status: u16 },
}

impl Membership {
    pub fn is_member(&self) -> bool {
        matches!(self, Membership::Member)
    }

    /// Map a membership endpoint status code. Only 200 denotes membership.
    pub fn from_status(status: u16) -> Self {
        if status == 200 {
            Membership::Member
        } else {
            Membership::NotMember { status }
        }
    }
}
