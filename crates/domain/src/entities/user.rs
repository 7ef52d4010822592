//! User entity - the owner of a character sheet and its XP pool.

use serde::Serialize;

use crate::ids::UserId;
use crate::value_objects::{Email, UserName};

/// A player account.
///
/// # Invariants
///
/// - `xp` is never negative (unsigned) and only changes through progression
///   outcomes on a [`CharacterSheet`](crate::aggregates::CharacterSheet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    xp: u32,
}

impl User {
    /// Create a new account with an empty XP pool.
    pub fn new(name: UserName, email: Email) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            xp: 0,
        }
    }

    /// Rebuild a user from persisted fields.
    pub fn restore(id: UserId, name: UserName, email: Email, xp: u32) -> Self {
        Self {
            id,
            name,
            email,
            xp,
        }
    }

    /// Starting XP balance at account creation.
    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = xp;
        self
    }

    #[inline]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    #[inline]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[inline]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub(crate) fn set_xp(&mut self, xp: u32) {
        self.xp = xp;
    }
}
